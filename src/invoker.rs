//! # OCR Invoker
//!
//! Executes the engine against a preprocessed image with a bounded wall-clock
//! timeout, returning the extracted text or a classified error.
//!
//! The image is serialized to a scoped temporary PNG consumable by the engine;
//! the temp handle drops on every exit path — success, engine failure, or
//! timeout — so no invocation leaves files behind. On timeout the spawned
//! process is killed, partial output is discarded, and no retry happens here;
//! retry is a caller decision.

use std::ffi::OsString;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use image::DynamicImage;
use tracing::{info, warn};

use crate::engine::Engine;
use crate::engine_config::EngineParams;
use crate::errors::{AppResult, OcrError};
use crate::process::{self, ProcessError};

/// Prefix used for the per-invocation temp image
const TEMP_PREFIX: &str = "ocr-studio-";

/// Recognize text in `image`, checking language availability first.
///
/// The language gate runs before any engine process is spawned; an
/// uninstalled language never costs an invocation.
pub async fn recognize(
    engine: &Engine,
    image: &DynamicImage,
    language: &str,
    params: &EngineParams,
    timeout_secs: u64,
) -> AppResult<String> {
    if !engine.is_language_installed(language) {
        return Err(OcrError::LanguageNotInstalled(format!(
            "language \"{}\" has no installed engine data",
            language
        )));
    }
    recognize_with_binary(&engine.binary, image, language, params, timeout_secs).await
}

/// Recognize text using an already-resolved engine binary.
pub async fn recognize_with_binary(
    binary: &Path,
    image: &DynamicImage,
    language: &str,
    params: &EngineParams,
    timeout_secs: u64,
) -> AppResult<String> {
    let start_time = std::time::Instant::now();

    // Scoped temp resource: dropped (and deleted) on every return path below.
    let temp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(".png")
        .tempfile()
        .map_err(|e| OcrError::OcrEngineError(format!("failed to create temp image: {}", e)))?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        image
            .write_to(&mut writer, image::ImageFormat::Png)
            .map_err(|e| OcrError::Preprocess(format!("failed to encode image: {}", e)))?;
        writer
            .flush()
            .map_err(|e| OcrError::OcrEngineError(format!("failed to write temp image: {}", e)))?;
    }

    let mut args: Vec<OsString> = vec![
        temp.path().as_os_str().to_os_string(),
        OsString::from("stdout"),
    ];
    args.push(OsString::from("-l"));
    args.push(OsString::from(language));
    for token in params.to_args() {
        args.push(OsString::from(token));
    }

    let result =
        process::invoke_with_timeout(binary, args, Duration::from_secs(timeout_secs)).await;
    let elapsed_ms = start_time.elapsed().as_millis();

    match result {
        Ok(output) => {
            // Text is returned exactly as the engine emitted it; trimming or
            // normalization is a caller concern.
            let text = output.stdout_text();
            info!(
                language,
                config = %params.config_string(),
                duration_ms = elapsed_ms,
                characters = text.len(),
                "OCR extraction completed"
            );
            Ok(text)
        }
        Err(ProcessError::TimedOut { timeout }) => {
            warn!(language, duration_ms = elapsed_ms, "OCR run timed out");
            Err(OcrError::OcrTimeout(format!(
                "OCR run exceeded {} second timeout",
                timeout.as_secs()
            )))
        }
        Err(ProcessError::NotFound(path)) => Err(OcrError::EngineNotFound(path)),
        Err(ProcessError::NonZeroExit { code, stderr }) => {
            warn!(language, exit_code = ?code, "OCR engine failed");
            Err(OcrError::OcrEngineError(format!(
                "engine exited with status {}: {}",
                code.map_or_else(|| "unknown".to_string(), |c| c.to_string()),
                stderr.trim()
            )))
        }
        Err(ProcessError::Io(msg)) => Err(OcrError::OcrEngineError(msg)),
    }
}
