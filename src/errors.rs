//! # Application Error Types
//!
//! Classified error taxonomy for the OCR front-end core.
//!
//! Environment-level errors (`EngineNotFound`, `VersionCheckFailed`,
//! `LanguageListFailed`) are fatal to a session: processing halts before any
//! upload is accepted. Per-request errors (timeout, engine failure, unsupported
//! language, oversized payload) are reported to the caller with a classified
//! reason and leave the system ready for the next request. Nothing in this core
//! retries automatically.

use std::fmt;

/// Classified error for OCR processing operations
#[derive(Debug, Clone, PartialEq)]
pub enum OcrError {
    /// OCR engine binary could not be located
    EngineNotFound(String),
    /// Version probe failed or produced unparsable output
    VersionCheckFailed(String),
    /// Language-list probe failed
    LanguageListFailed(String),
    /// Engine mode or segmentation mode index out of range
    InvalidMode(String),
    /// Display name absent from the language catalog
    UnknownLanguage(String),
    /// Catalog language without installed engine data
    LanguageNotInstalled(String),
    /// Upload exceeds the accepted size limit
    PayloadTooLarge(String),
    /// Engine run exceeded its wall-clock timeout
    OcrTimeout(String),
    /// Engine exited nonzero or could not be executed
    OcrEngineError(String),
    /// Malformed or corrupt image input
    Preprocess(String),
    /// PDF rasterization failed
    PdfRender(String),
    /// Configuration validation errors
    Config(String),
}

impl fmt::Display for OcrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OcrError::EngineNotFound(msg) => write!(f, "[ENGINE_NOT_FOUND] {}", msg),
            OcrError::VersionCheckFailed(msg) => write!(f, "[VERSION_CHECK] {}", msg),
            OcrError::LanguageListFailed(msg) => write!(f, "[LANGUAGE_LIST] {}", msg),
            OcrError::InvalidMode(msg) => write!(f, "[INVALID_MODE] {}", msg),
            OcrError::UnknownLanguage(msg) => write!(f, "[UNKNOWN_LANGUAGE] {}", msg),
            OcrError::LanguageNotInstalled(msg) => write!(f, "[LANGUAGE_NOT_INSTALLED] {}", msg),
            OcrError::PayloadTooLarge(msg) => write!(f, "[PAYLOAD_TOO_LARGE] {}", msg),
            OcrError::OcrTimeout(msg) => write!(f, "[OCR_TIMEOUT] {}", msg),
            OcrError::OcrEngineError(msg) => write!(f, "[OCR_ENGINE] {}", msg),
            OcrError::Preprocess(msg) => write!(f, "[PREPROCESS] {}", msg),
            OcrError::PdfRender(msg) => write!(f, "[PDF_RENDER] {}", msg),
            OcrError::Config(msg) => write!(f, "[CONFIG] {}", msg),
        }
    }
}

impl std::error::Error for OcrError {}

impl From<image::ImageError> for OcrError {
    fn from(err: image::ImageError) -> Self {
        OcrError::Preprocess(err.to_string())
    }
}

impl From<anyhow::Error> for OcrError {
    fn from(err: anyhow::Error) -> Self {
        OcrError::OcrEngineError(err.to_string())
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, OcrError>;

/// True for errors that must halt the session before uploads are accepted.
pub fn is_fatal(error: &OcrError) -> bool {
    matches!(
        error,
        OcrError::EngineNotFound(_)
            | OcrError::VersionCheckFailed(_)
            | OcrError::LanguageListFailed(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_classification_tag() {
        let err = OcrError::OcrTimeout("engine exceeded 20s".to_string());
        assert!(err.to_string().starts_with("[OCR_TIMEOUT]"));

        let err = OcrError::PayloadTooLarge("209715201 bytes".to_string());
        assert!(err.to_string().contains("[PAYLOAD_TOO_LARGE]"));
    }

    #[test]
    fn test_fatal_classification() {
        assert!(is_fatal(&OcrError::EngineNotFound("not on PATH".into())));
        assert!(is_fatal(&OcrError::VersionCheckFailed("garbage output".into())));
        assert!(is_fatal(&OcrError::LanguageListFailed("exit 1".into())));

        assert!(!is_fatal(&OcrError::OcrTimeout("20s".into())));
        assert!(!is_fatal(&OcrError::LanguageNotInstalled("deu".into())));
        assert!(!is_fatal(&OcrError::PayloadTooLarge("too big".into())));
    }
}
