//! Runtime configuration
//!
//! Everything comes from the process environment. A `.env` file in the
//! working directory is loaded first, so `API_KEY=...` can live there.

use tracing::{info, warn};

/// Default Gemini model used for image editing
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

/// Default Gemini REST endpoint
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// URL copied to the clipboard by the Share button
pub const DEFAULT_SHARE_URL: &str = "https://github.com/clearview-ai/clearview";

/// Application configuration
#[derive(Clone, PartialEq)]
pub struct Config {
    /// Gemini API key (`API_KEY`). Absence only fails when processing starts.
    pub api_key: Option<String>,
    /// Model name (`GEMINI_MODEL`)
    pub model: String,
    /// API base URL without trailing slash (`GEMINI_API_BASE`)
    pub api_base: String,
    /// Share URL (`CLEARVIEW_SHARE_URL`)
    pub share_url: String,
}

impl Config {
    /// Load `.env` (if any) and read the process environment
    pub fn from_env() -> Self {
        if let Err(e) = dotenv::dotenv() {
            // A missing .env is the common case
            tracing::debug!("No .env loaded: {}", e);
        }

        let config = Self::from_lookup(|key| std::env::var(key).ok());

        if config.api_key.is_none() {
            warn!("API_KEY is not set; processing will fail until it is configured");
        }
        info!("Using model {} at {}", config.model, config.api_base);

        config
    }

    /// Build a configuration from any key/value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            api_key: non_empty("API_KEY"),
            model: non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: non_empty("GEMINI_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            share_url: non_empty("CLEARVIEW_SHARE_URL")
                .unwrap_or_else(|| DEFAULT_SHARE_URL.to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

// Keep the key out of logs
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("share_url", &self.share_url)
            .finish()
    }
}
