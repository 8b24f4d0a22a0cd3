//! `data:<mime>;base64,<payload>` helpers
//!
//! Images live in memory as data URLs for the whole session, the same
//! shape the Gemini API consumes and produces.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::DataUrlError;

/// Fallback MIME type when the remote service does not name one
pub const DEFAULT_MIME: &str = "image/png";

/// Build a data URL from raw bytes
pub fn encode(mime_type: &str, bytes: &[u8]) -> String {
    from_base64(mime_type, &STANDARD.encode(bytes))
}

/// Build a data URL from an already base64-encoded payload
pub fn from_base64(mime_type: &str, payload: &str) -> String {
    format!("data:{};base64,{}", mime_type, payload)
}

/// Split a data URL into its MIME type and base64 payload
pub fn parse(data_url: &str) -> Result<(&str, &str), DataUrlError> {
    let rest = data_url.strip_prefix("data:").ok_or(DataUrlError::Malformed)?;
    let (header, payload) = rest.split_once(',').ok_or(DataUrlError::Malformed)?;
    let mime_type = header
        .strip_suffix(";base64")
        .ok_or(DataUrlError::NotBase64)?;

    Ok((mime_type, payload))
}

/// Return the raw base64 payload, dropping a `data:<mime>;base64,` prefix if present
pub fn strip_prefix(input: &str) -> &str {
    match parse(input) {
        Ok((_, payload)) => payload,
        Err(_) => input,
    }
}

/// Decode the payload of a data URL back into bytes
pub fn decode(data_url: &str) -> Result<Vec<u8>, DataUrlError> {
    let (_, payload) = parse(data_url)?;
    STANDARD
        .decode(payload)
        .map_err(|e| DataUrlError::Decode(e.to_string()))
}
