//! Shared data structures for the application state
//!
//! These structs represent the data model that flows between
//! the intake, the remote client and the UI layer.

use chrono::Utc;
use uuid::Uuid;

use crate::data_url;
use crate::error::DataUrlError;

/// An image held in memory as a data URL
///
/// Assets are immutable once created: fields are private and only
/// readable through accessors.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    /// Unique identifier (`orig_<uuid>` or `res_<uuid>`)
    id: String,
    /// Image payload as `data:<mime>;base64,<payload>`
    data_url: String,
    /// MIME type, e.g. "image/jpeg"
    mime_type: String,
    /// Pixel width, when the header could be probed
    width: Option<u32>,
    /// Pixel height, when the header could be probed
    height: Option<u32>,
    /// Creation time in epoch milliseconds
    timestamp: i64,
}

impl ImageAsset {
    /// Create a new asset with a fresh identifier and the current timestamp
    ///
    /// `prefix` tags where the asset came from ("orig" or "res").
    pub fn new(
        prefix: &str,
        data_url: String,
        mime_type: String,
        dimensions: Option<(u32, u32)>,
    ) -> Self {
        Self {
            id: format!("{}_{}", prefix, Uuid::new_v4().simple()),
            data_url,
            mime_type,
            width: dimensions.map(|(w, _)| w),
            height: dimensions.map(|(_, h)| h),
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Both dimensions, if known
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.width.zip(self.height)
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Decode the data URL back into the encoded image bytes
    pub fn bytes(&self) -> Result<Vec<u8>, DataUrlError> {
        data_url::decode(&self.data_url)
    }
}

/// Probe the pixel dimensions of an encoded image without decoding it fully
pub fn probe_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    image::ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}
