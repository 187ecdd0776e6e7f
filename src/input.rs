//! # Upload Boundary
//!
//! Accepts raw uploaded bytes from the UI layer: enforces the size limit
//! before anything else touches the payload, classifies image vs PDF, and
//! decodes images into the immutable `RawImage` value the pipeline works on.

use image::{DynamicImage, ImageFormat};
use tracing::debug;

use crate::errors::{AppResult, OcrError};

/// Maximum accepted upload size (200 MB)
pub const MAX_UPLOAD_BYTES: u64 = 200 * 1024 * 1024;

/// Upload classification derived from the declared MIME type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Image,
    Pdf,
}

/// Classify an upload by its declared MIME type.
pub fn classify_upload(declared_mime: &str) -> AppResult<UploadKind> {
    let mime = declared_mime.trim().to_ascii_lowercase();
    if mime == "application/pdf" {
        return Ok(UploadKind::Pdf);
    }
    if mime.starts_with("image/") {
        return Ok(UploadKind::Image);
    }
    Err(OcrError::Preprocess(format!(
        "unsupported upload type: {}",
        declared_mime
    )))
}

/// Reject payloads over `max_bytes` before any processing happens.
pub fn check_payload_size(len: u64, max_bytes: u64) -> AppResult<()> {
    if len > max_bytes {
        return Err(OcrError::PayloadTooLarge(format!(
            "payload of {} bytes exceeds the {} byte limit",
            len, max_bytes
        )));
    }
    Ok(())
}

/// Immutable pixel buffer as uploaded, with its source attributes.
///
/// Owned by the session; a new upload replaces it wholesale. Preprocessing
/// derives from it without ever mutating it.
#[derive(Debug, Clone)]
pub struct RawImage {
    pub image: DynamicImage,
    pub width: u32,
    pub height: u32,
    /// Bits per pixel of the decoded buffer
    pub color_depth: u16,
    /// Source format detected from the payload's magic bytes
    pub format: Option<ImageFormat>,
}

impl RawImage {
    /// Wrap an already-decoded image (the PDF page path).
    pub fn from_decoded(image: DynamicImage, format: Option<ImageFormat>) -> Self {
        let width = image.width();
        let height = image.height();
        let color_depth = image.color().bits_per_pixel();
        Self {
            image,
            width,
            height,
            color_depth,
            format,
        }
    }
}

/// Accept an uploaded image payload: size gate, then format detection and
/// decode. Malformed or corrupt payloads classify as `Preprocess` errors.
pub fn accept_upload(bytes: &[u8], max_bytes: u64) -> AppResult<RawImage> {
    check_payload_size(bytes.len() as u64, max_bytes)?;

    let format = image::guess_format(bytes).ok();
    let image = image::load_from_memory(bytes)
        .map_err(|e| OcrError::Preprocess(format!("could not decode uploaded image: {}", e)))?;

    let raw = RawImage::from_decoded(image, format);
    debug!(
        width = raw.width,
        height = raw.height,
        color_depth = raw.color_depth,
        format = ?raw.format,
        "upload accepted"
    );
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(8, 6, image::Luma([200])));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("in-memory PNG encode succeeds");
        bytes
    }

    #[test]
    fn test_classify_upload() {
        assert_eq!(classify_upload("image/png").unwrap(), UploadKind::Image);
        assert_eq!(classify_upload("image/jpeg").unwrap(), UploadKind::Image);
        assert_eq!(classify_upload("application/pdf").unwrap(), UploadKind::Pdf);
        assert!(classify_upload("text/plain").is_err());
    }

    #[test]
    fn test_accept_upload_decodes_png() {
        let raw = accept_upload(&png_bytes(), MAX_UPLOAD_BYTES).expect("valid PNG is accepted");
        assert_eq!((raw.width, raw.height), (8, 6));
        assert_eq!(raw.format, Some(ImageFormat::Png));
        assert_eq!(raw.color_depth, 8);
    }

    #[test]
    fn test_oversized_payload_rejected_before_decoding() {
        // Truncated garbage over the limit must classify as PayloadTooLarge,
        // never as a decode failure.
        let err = accept_upload(&[0u8; 32], 16).expect_err("over limit");
        assert!(matches!(err, OcrError::PayloadTooLarge(_)));
    }

    #[test]
    fn test_payload_at_limit_is_allowed_through_size_gate() {
        assert!(check_payload_size(MAX_UPLOAD_BYTES, MAX_UPLOAD_BYTES).is_ok());
        assert!(check_payload_size(MAX_UPLOAD_BYTES + 1, MAX_UPLOAD_BYTES).is_err());
    }

    #[test]
    fn test_corrupt_payload_is_preprocess_error() {
        let err = accept_upload(b"not an image at all", MAX_UPLOAD_BYTES)
            .expect_err("garbage cannot decode");
        assert!(matches!(err, OcrError::Preprocess(_)));
    }
}
