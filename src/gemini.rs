//! Gemini client for watermark removal
//!
//! One `generateContent` request per image: the image goes up as inline
//! data next to a fixed instruction, and the first inline image in the
//! reply comes back as a data URL.

use std::sync::Arc;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::data_url::{self, DEFAULT_MIME};
use crate::error::{ProcessError, ProcessResult};
use crate::state::data::{probe_dimensions, ImageAsset};

/// Instruction sent alongside every image
pub const PROMPT: &str = "Remove all watermarks, logos, and text overlays from this image. \
Fill in the background naturally where the watermarks were removed to make it look like \
the original clean image. Return ONLY the cleaned image.";

/// Client for the Gemini `generateContent` endpoint
#[derive(Clone)]
pub struct GeminiClient {
    client: Arc<Client>,
    api_key: Option<String>,
    api_base: String,
    model: String,
}

impl GeminiClient {
    /// Create a client from the application configuration
    ///
    /// A missing key is accepted here and reported on the first call.
    pub fn new(config: &Config) -> Self {
        Self::with_client(Arc::new(Client::new()), config)
    }

    /// Create a client that shares an existing HTTP client
    pub fn with_client(client: Arc<Client>, config: &Config) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            api_base: config.api_base.clone(),
            model: config.model.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    /// Send an image to Gemini and return the cleaned image as a data URL
    ///
    /// `image` may be a full data URL or a bare base64 payload.
    pub async fn remove_watermark(&self, image: &str, mime_type: &str) -> ProcessResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(ProcessError::MissingCredential)?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part {
                        inline_data: Some(InlineData {
                            mime_type: Some(mime_type.to_string()),
                            data: Some(data_url::strip_prefix(image).to_string()),
                        }),
                        text: None,
                    },
                    Part {
                        inline_data: None,
                        text: Some(PROMPT.to_string()),
                    },
                ],
            }],
        };

        info!("Sending {} image to {}", mime_type, self.model);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini request failed: {}", e);
                ProcessError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Gemini API error ({}): {}", status, body);

            return Err(ProcessError::Api {
                status: status.as_u16(),
                message: api_error_message(&body)
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string()),
            });
        }

        let body: GenerateContentResponse = response.json().await?;
        let cleaned = extract_image(body)?;

        debug!("Gemini returned {} bytes of base64", cleaned.len());
        Ok(cleaned)
    }

    /// Clean an uploaded asset and wrap the reply as a result asset
    pub async fn clean_image(&self, original: &ImageAsset) -> ProcessResult<ImageAsset> {
        let cleaned = self
            .remove_watermark(original.data_url(), original.mime_type())
            .await?;

        let mime_type = data_url::parse(&cleaned)?.0.to_string();
        let bytes = data_url::decode(&cleaned)?;
        let dimensions = probe_dimensions(&bytes);

        let result = ImageAsset::new("res", cleaned, mime_type, dimensions);
        debug!("Result {} for {}: {:?}", result.id(), original.id(), dimensions);
        Ok(result)
    }
}

/// Pull the first inline image out of a response
fn extract_image(response: GenerateContentResponse) -> ProcessResult<String> {
    let parts = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts)
        .filter(|parts| !parts.is_empty())
        .ok_or(ProcessError::NoContent)?;

    parts
        .into_iter()
        .filter_map(|part| part.inline_data)
        .find_map(|inline| {
            let data = inline.data.filter(|d| !d.is_empty())?;
            let mime_type = inline
                .mime_type
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_MIME.to_string());
            Some(data_url::from_base64(&mime_type, &data))
        })
        .ok_or(ProcessError::NoImage)
}

/// Extract `error.message` from a Google API error body
fn api_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|b| b.error.message)
        .filter(|m| !m.is_empty())
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(skip_serializing_if = "Option::is_none")]
    mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataUrlError;
    use mockito::Matcher;
    use serde_json::json;

    const ENDPOINT: &str = "/models/gemini-2.5-flash-image:generateContent";

    fn config(api_base: String, api_key: Option<&str>) -> Config {
        Config {
            api_key: api_key.map(str::to_string),
            api_base,
            ..Config::default()
        }
    }

    fn parse(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_extract_first_inline_image() {
        let response = parse(json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Here you go" },
                        { "inlineData": { "mimeType": "image/jpeg", "data": "QUJD" } },
                        { "inlineData": { "mimeType": "image/png", "data": "REVG" } }
                    ]
                }
            }]
        }));

        assert_eq!(extract_image(response).unwrap(), "data:image/jpeg;base64,QUJD");
    }

    #[test]
    fn test_extract_defaults_to_png() {
        let response = parse(json!({
            "candidates": [{ "content": { "parts": [ { "inlineData": { "data": "QUJD" } } ] } }]
        }));

        assert_eq!(extract_image(response).unwrap(), "data:image/png;base64,QUJD");
    }

    #[test]
    fn test_extract_no_content() {
        assert_eq!(extract_image(parse(json!({}))), Err(ProcessError::NoContent));
        assert_eq!(
            extract_image(parse(json!({ "candidates": [{}] }))),
            Err(ProcessError::NoContent)
        );
        assert_eq!(
            extract_image(parse(json!({ "candidates": [{ "content": { "parts": [] } }] }))),
            Err(ProcessError::NoContent)
        );
    }

    #[test]
    fn test_extract_parts_without_image() {
        let response = parse(json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "I cannot edit this image." },
                        { "inlineData": { "mimeType": "image/png", "data": "" } }
                    ]
                }
            }]
        }));

        assert_eq!(extract_image(response), Err(ProcessError::NoImage));
    }

    #[test]
    fn test_api_error_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(api_error_message(body).as_deref(), Some("API key not valid."));
        assert_eq!(api_error_message("<html>"), None);
    }

    #[tokio::test]
    async fn test_missing_credential_sends_nothing() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", ENDPOINT)
            .expect(0)
            .create_async()
            .await;

        let client = GeminiClient::new(&config(server.url(), None));
        let result = client
            .remove_watermark("data:image/png;base64,QUJD", "image/png")
            .await;

        assert_eq!(result, Err(ProcessError::MissingCredential));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_remove_watermark_round_trip() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", ENDPOINT)
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::PartialJson(json!({
                "contents": [{
                    "parts": [
                        { "inlineData": { "mimeType": "image/jpeg", "data": "QUJD" } },
                        { "text": PROMPT }
                    ]
                }]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "candidates": [{
                        "content": {
                            "parts": [ { "inlineData": { "mimeType": "image/png", "data": "REVG" } } ]
                        }
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = GeminiClient::new(&config(server.url(), Some("test-key")));
        let result = client
            .remove_watermark("data:image/jpeg;base64,QUJD", "image/jpeg")
            .await
            .unwrap();

        assert_eq!(result, "data:image/png;base64,REVG");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", ENDPOINT)
            .with_status(403)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":{"code":403,"message":"Permission denied"}}"#)
            .create_async()
            .await;

        let client = GeminiClient::new(&config(server.url(), Some("bad-key")));
        let result = client.remove_watermark("QUJD", "image/png").await;

        assert_eq!(
            result,
            Err(ProcessError::Api {
                status: 403,
                message: "Permission denied".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_response_without_image() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", ENDPOINT)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Sorry"}]}}]}"#)
            .create_async()
            .await;

        let client = GeminiClient::new(&config(server.url(), Some("test-key")));
        let result = client.remove_watermark("QUJD", "image/png").await;

        assert_eq!(result, Err(ProcessError::NoImage));
    }

    #[tokio::test]
    async fn test_transport_error() {
        // Nothing listens on port 9 of localhost
        let client = GeminiClient::new(&config("http://127.0.0.1:9".to_string(), Some("k")));
        let result = client.remove_watermark("QUJD", "image/png").await;

        assert!(matches!(result, Err(ProcessError::Transport(_))));
    }

    #[tokio::test]
    async fn test_clean_image_wraps_result() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", ENDPOINT)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[{"content":{"parts":[{"inlineData":{"mimeType":"image/webp","data":"UklGRg=="}}]}}]}"#)
            .create_async()
            .await;

        let original = ImageAsset::new(
            "orig",
            "data:image/jpeg;base64,QUJD".to_string(),
            "image/jpeg".to_string(),
            None,
        );
        let client = GeminiClient::new(&config(server.url(), Some("test-key")));
        let result = client.clean_image(&original).await.unwrap();

        assert!(result.id().starts_with("res_"));
        assert_eq!(result.mime_type(), "image/webp");
        assert_eq!(result.bytes().unwrap(), b"RIFF");
    }

    #[tokio::test]
    async fn test_clean_image_rejects_bad_payload() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", ENDPOINT)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[{"content":{"parts":[{"inlineData":{"mimeType":"image/png","data":"@@@"}}]}}]}"#)
            .create_async()
            .await;

        let original = ImageAsset::new(
            "orig",
            "data:image/png;base64,QUJD".to_string(),
            "image/png".to_string(),
            None,
        );
        let client = GeminiClient::new(&config(server.url(), Some("test-key")));
        let result = client.clean_image(&original).await;

        assert!(matches!(
            result,
            Err(ProcessError::InvalidDataUrl(DataUrlError::Decode(_)))
        ));
    }

    #[tokio::test]
    async fn test_empty_candidates_is_no_content() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", ENDPOINT)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[]}"#)
            .create_async()
            .await;

        let client = GeminiClient::new(&config(server.url(), Some("test-key")));
        let result = client.remove_watermark("QUJD", "image/png").await;

        assert_eq!(result, Err(ProcessError::NoContent));
    }
}
