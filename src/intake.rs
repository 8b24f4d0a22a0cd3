//! Upload intake
//!
//! Validates a picked or dropped file and reads it into an `ImageAsset`.
//! Validation runs on metadata only, so rejected files are never read.

use std::path::{Path, PathBuf};

use image::ImageFormat;
use tracing::{info, warn};

use crate::data_url;
use crate::error::{IntakeError, MAX_UPLOAD_BYTES};
use crate::state::data::{probe_dimensions, ImageAsset};

/// Extensions offered in the open dialog
pub const PICKER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "bmp", "tif", "tiff"];

/// MIME type implied by a file's extension, if it names a known image format
pub fn mime_type_for(path: &Path) -> Option<&'static str> {
    ImageFormat::from_path(path).ok().map(|format| format.to_mime_type())
}

/// Check the MIME type and size of a candidate upload
///
/// Returns the MIME type to record on the asset.
pub fn validate(path: &Path, size: u64) -> Result<&'static str, IntakeError> {
    let mime_type = mime_type_for(path)
        .filter(|mime| mime.starts_with("image/"))
        .ok_or(IntakeError::NotAnImage)?;

    if size > MAX_UPLOAD_BYTES {
        return Err(IntakeError::TooLarge { size });
    }

    Ok(mime_type)
}

/// Validate and read an image file into memory
pub async fn load_image(path: PathBuf) -> Result<ImageAsset, IntakeError> {
    let io_error = |e: std::io::Error| IntakeError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    };

    let size = tokio::fs::metadata(&path).await.map_err(io_error)?.len();

    let mime_type = validate(&path, size).map_err(|e| {
        warn!("Rejected {}: {}", path.display(), e);
        e
    })?;

    let bytes = tokio::fs::read(&path).await.map_err(io_error)?;
    let dimensions = probe_dimensions(&bytes);

    info!(
        "📷 Loaded {} ({}, {:.1} KB, {:?})",
        path.display(),
        mime_type,
        bytes.len() as f64 / 1024.0,
        dimensions
    );

    Ok(ImageAsset::new(
        "orig",
        data_url::encode(mime_type, &bytes),
        mime_type.to_string(),
        dimensions,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use std::fs::File;
    use std::io::Cursor;

    fn jpeg_bytes() -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        RgbImage::new(4, 3)
            .write_to(&mut buffer, ImageFormat::Jpeg)
            .unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(mime_type_for(Path::new("a.PNG")), Some("image/png"));
        assert_eq!(mime_type_for(Path::new("b.jpeg")), Some("image/jpeg"));
        assert_eq!(mime_type_for(Path::new("c.webp")), Some("image/webp"));
        assert_eq!(mime_type_for(Path::new("notes.txt")), None);
        assert_eq!(mime_type_for(Path::new("no_extension")), None);
    }

    #[test]
    fn test_validate_limits() {
        let photo = Path::new("photo.jpg");
        assert_eq!(validate(photo, 2 * 1024 * 1024), Ok("image/jpeg"));
        assert_eq!(validate(photo, MAX_UPLOAD_BYTES), Ok("image/jpeg"));
        assert_eq!(
            validate(photo, MAX_UPLOAD_BYTES + 1),
            Err(IntakeError::TooLarge { size: MAX_UPLOAD_BYTES + 1 })
        );
        assert_eq!(validate(Path::new("doc.pdf"), 10), Err(IntakeError::NotAnImage));
    }

    #[tokio::test]
    async fn test_load_image_keeps_bytes_and_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        let bytes = jpeg_bytes();
        std::fs::write(&path, &bytes).unwrap();

        let asset = load_image(path).await.unwrap();

        assert_eq!(asset.mime_type(), "image/jpeg");
        assert!(asset.id().starts_with("orig_"));
        assert_eq!(asset.dimensions(), Some((4, 3)));
        assert_eq!(asset.bytes().unwrap(), bytes);
    }

    #[tokio::test]
    async fn test_load_image_rejects_oversized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.png");
        File::create(&path)
            .unwrap()
            .set_len(11 * 1024 * 1024)
            .unwrap();

        let result = load_image(path).await;
        assert!(matches!(result, Err(IntakeError::TooLarge { .. })));
    }

    #[tokio::test]
    async fn test_load_image_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        assert_eq!(load_image(path).await, Err(IntakeError::NotAnImage));
    }

    #[tokio::test]
    async fn test_load_image_missing_file() {
        let result = load_image(PathBuf::from("/nonexistent/photo.png")).await;
        assert!(matches!(result, Err(IntakeError::Io { .. })));
    }
}
