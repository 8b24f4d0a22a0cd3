//! Error types for ClearView
//!
//! Each concern has its own enum:
//! - `DataUrlError` for malformed `data:` URLs
//! - `IntakeError` for files the user tries to load
//! - `ProcessError` for the remote watermark removal call

use thiserror::Error;

/// Maximum accepted upload size in bytes (10 MB)
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Errors raised while parsing a data URL
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DataUrlError {
    /// The string does not start with `data:` or lacks the `,` separator
    #[error("not a data URL")]
    Malformed,

    /// Only base64 payloads are supported
    #[error("data URL is not base64 encoded")]
    NotBase64,

    /// The payload failed to decode
    #[error("invalid base64 payload: {0}")]
    Decode(String),
}

/// Errors raised while loading an image file from disk
///
/// `NotAnImage` and `TooLarge` are validation errors: they are shown to the
/// user directly and never create a session.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IntakeError {
    #[error("Please upload a valid image file.")]
    NotAnImage,

    #[error("File size too large. Please upload an image smaller than 10MB.")]
    TooLarge { size: u64 },

    #[error("Failed to read {path}: {message}")]
    Io { path: String, message: String },
}

impl IntakeError {
    /// Whether this is a user-facing validation error rather than an I/O failure
    pub fn is_validation(&self) -> bool {
        matches!(self, IntakeError::NotAnImage | IntakeError::TooLarge { .. })
    }
}

/// Errors raised by the Gemini client
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProcessError {
    /// No API key configured; the request is never sent
    #[error("API Key is missing. Please set API_KEY in your environment configuration.")]
    MissingCredential,

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Gemini API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("No content returned from Gemini.")]
    NoContent,

    #[error("The model processed the request but did not return an image. Please try again.")]
    NoImage,

    #[error("Invalid image data: {0}")]
    InvalidDataUrl(#[from] DataUrlError),
}

impl From<reqwest::Error> for ProcessError {
    fn from(err: reqwest::Error) -> Self {
        ProcessError::Transport(err.to_string())
    }
}

/// A specialized `Result` type for the remote client
pub type ProcessResult<T> = std::result::Result<T, ProcessError>;
