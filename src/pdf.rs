//! # PDF Rasterizer Boundary
//!
//! Converts a PDF payload into an ordered sequence of page images by calling
//! the external `pdftoppm` converter (poppler-utils) through the shared
//! process abstraction. Each page then flows through the same preprocessing
//! and OCR path as a plain image upload; the page results are joined with a
//! form-feed separator, matching the engine's own multi-page convention.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use image::DynamicImage;
use tracing::{debug, info};

use crate::errors::{AppResult, OcrError};
use crate::process::{self, ProcessError};

/// Separator placed between per-page OCR results
pub const PAGE_SEPARATOR: &str = "\u{000C}";

/// Rasterizer binary expected on PATH
pub const RASTERIZER_BINARY: &str = "pdftoppm";

// Rasterizing a large document is slow but not unbounded; a stuck converter
// still gets killed.
const RASTERIZE_TIMEOUT: Duration = Duration::from_secs(120);

/// Render each page of `pdf_bytes` to an image at `dpi`.
///
/// Pages come back in document order. All intermediate files live in a
/// scoped temp directory that is removed on every exit path.
pub async fn rasterize_pdf(pdf_bytes: &[u8], dpi: u32) -> AppResult<Vec<DynamicImage>> {
    let workdir = tempfile::Builder::new()
        .prefix("ocr-studio-pdf-")
        .tempdir()
        .map_err(|e| OcrError::PdfRender(format!("failed to create work directory: {}", e)))?;

    let pdf_path = workdir.path().join("input.pdf");
    {
        let mut file = std::fs::File::create(&pdf_path)
            .map_err(|e| OcrError::PdfRender(format!("failed to stage PDF: {}", e)))?;
        file.write_all(pdf_bytes)
            .map_err(|e| OcrError::PdfRender(format!("failed to stage PDF: {}", e)))?;
    }

    let prefix = workdir.path().join("page");
    let args = [
        "-r".to_string(),
        dpi.to_string(),
        "-png".to_string(),
        pdf_path.display().to_string(),
        prefix.display().to_string(),
    ];

    process::invoke_with_timeout(std::path::Path::new(RASTERIZER_BINARY), args, RASTERIZE_TIMEOUT)
        .await
        .map_err(|e| match e {
            ProcessError::NotFound(_) => OcrError::PdfRender(format!(
                "{} not found; install poppler-utils to process PDF uploads",
                RASTERIZER_BINARY
            )),
            other => OcrError::PdfRender(other.to_string()),
        })?;

    // pdftoppm names pages page-1.png, page-2.png, ...; zero-padded when the
    // document is long enough, so sort by page number, not lexically.
    let mut pages: Vec<(u32, PathBuf)> = std::fs::read_dir(workdir.path())
        .map_err(|e| OcrError::PdfRender(format!("failed to list rendered pages: {}", e)))?
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            let name = path.file_name()?.to_str()?;
            let number: u32 = name
                .strip_prefix("page-")?
                .strip_suffix(".png")?
                .parse()
                .ok()?;
            Some((number, path))
        })
        .collect();
    pages.sort_by_key(|(number, _)| *number);

    if pages.is_empty() {
        return Err(OcrError::PdfRender(
            "rasterizer produced no page images".to_string(),
        ));
    }

    let mut images = Vec::with_capacity(pages.len());
    for (number, path) in pages {
        debug!(page = number, path = %path.display(), "decoding rendered page");
        let image = image::open(&path)
            .map_err(|e| OcrError::PdfRender(format!("failed to decode page {}: {}", number, e)))?;
        images.push(image);
    }

    info!(pages = images.len(), dpi, "PDF rasterized");
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_pdf_is_classified_as_pdf_render() {
        // Either pdftoppm is absent or it rejects the garbage payload; both
        // must classify as PdfRender, never as an engine error.
        let err = rasterize_pdf(b"not a pdf", 150)
            .await
            .expect_err("garbage payload cannot rasterize");
        assert!(matches!(err, OcrError::PdfRender(_)));
    }
}
