//! # Extraction Pipeline
//!
//! High-level request flow tying the boundaries together: language gate,
//! preprocessing, engine invocation. One request is processed to completion
//! (or timeout) before the next; there is no concurrent engine state here.

use tracing::info;

use crate::engine::Engine;
use crate::engine_config::EngineParams;
use crate::errors::{AppResult, OcrError};
use crate::input::{self, RawImage};
use crate::invoker;
use crate::pdf;
use crate::preprocessing::{self, PreprocessConfig};

/// Preprocess an uploaded image and run OCR on the result.
pub async fn extract_text(
    engine: &Engine,
    raw: &RawImage,
    preprocess_config: &PreprocessConfig,
    language: &str,
    params: &EngineParams,
    timeout_secs: u64,
) -> AppResult<String> {
    // The language gate runs before the (possibly expensive) preprocessing.
    if !engine.is_language_installed(language) {
        return Err(OcrError::LanguageNotInstalled(format!(
            "language \"{}\" has no installed engine data",
            language
        )));
    }

    let processed = preprocessing::preprocess(&raw.image, preprocess_config)?;
    invoker::recognize(engine, &processed, language, params, timeout_secs).await
}

/// Rasterize a PDF payload and run each page through the same path,
/// concatenating page texts with the page separator.
pub async fn extract_text_from_pdf(
    engine: &Engine,
    pdf_bytes: &[u8],
    preprocess_config: &PreprocessConfig,
    language: &str,
    params: &EngineParams,
    timeout_secs: u64,
    dpi: u32,
    max_bytes: u64,
) -> AppResult<String> {
    input::check_payload_size(pdf_bytes.len() as u64, max_bytes)?;
    if !engine.is_language_installed(language) {
        return Err(OcrError::LanguageNotInstalled(format!(
            "language \"{}\" has no installed engine data",
            language
        )));
    }

    let pages = pdf::rasterize_pdf(pdf_bytes, dpi).await?;
    let page_count = pages.len();

    let mut texts = Vec::with_capacity(page_count);
    for (index, page) in pages.iter().enumerate() {
        let processed = preprocessing::preprocess(page, preprocess_config)?;
        let text = invoker::recognize(engine, &processed, language, params, timeout_secs).await?;
        info!(page = index + 1, pages = page_count, "page recognized");
        texts.push(text);
    }

    Ok(texts.join(pdf::PAGE_SEPARATOR))
}
