//! # Application Configuration
//!
//! Centralized runtime settings loaded from environment variables, with
//! validation at startup. Everything has a sensible default so a bare
//! environment still works once the engine itself is installed.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::engine::BINARY_ENV_VAR;
use crate::errors::{AppResult, OcrError};
use crate::input::MAX_UPLOAD_BYTES;
use crate::languages;

/// Default OCR timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
/// Upper bound accepted for the OCR timeout
pub const MAX_TIMEOUT_SECS: u64 = 300;
/// Default rasterization resolution for PDF pages
pub const DEFAULT_PDF_DPI: u32 = 200;

/// Runtime configuration for the OCR front-end
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Explicit engine binary path (`TESSERACT_CMD`), bypassing discovery
    pub binary_override: Option<PathBuf>,
    /// Hard wall-clock timeout per engine invocation, in seconds
    pub timeout_secs: u64,
    /// Maximum accepted upload size in bytes
    pub max_upload_bytes: u64,
    /// Rasterization resolution for PDF pages
    pub pdf_dpi: u32,
    /// Default recognition language code
    pub language: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            binary_override: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_upload_bytes: MAX_UPLOAD_BYTES,
            pdf_dpi: DEFAULT_PDF_DPI,
            language: languages::DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment, falling back to defaults.
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(path) = env::var(BINARY_ENV_VAR) {
            if !path.trim().is_empty() {
                config.binary_override = Some(PathBuf::from(path));
            }
        }

        if let Ok(value) = env::var("OCR_TIMEOUT_SECS") {
            config.timeout_secs = value.parse().map_err(|_| {
                OcrError::Config(format!("OCR_TIMEOUT_SECS must be an integer, got {:?}", value))
            })?;
        }

        if let Ok(value) = env::var("OCR_MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = value.parse().map_err(|_| {
                OcrError::Config(format!(
                    "OCR_MAX_UPLOAD_BYTES must be an integer, got {:?}",
                    value
                ))
            })?;
        }

        if let Ok(value) = env::var("OCR_PDF_DPI") {
            config.pdf_dpi = value.parse().map_err(|_| {
                OcrError::Config(format!("OCR_PDF_DPI must be an integer, got {:?}", value))
            })?;
        }

        if let Ok(value) = env::var("OCR_LANGUAGE") {
            if !value.trim().is_empty() {
                config.language = value.trim().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> AppResult<()> {
        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(OcrError::Config(format!(
                "timeout_secs must be in 1..={}, got {}",
                MAX_TIMEOUT_SECS, self.timeout_secs
            )));
        }
        if self.max_upload_bytes == 0 {
            return Err(OcrError::Config(
                "max_upload_bytes must be greater than 0".to_string(),
            ));
        }
        if !(72..=600).contains(&self.pdf_dpi) {
            return Err(OcrError::Config(format!(
                "pdf_dpi must be in 72..=600, got {}",
                self.pdf_dpi
            )));
        }
        if self.language.trim().is_empty() {
            return Err(OcrError::Config("language cannot be empty".to_string()));
        }
        Ok(())
    }
}
