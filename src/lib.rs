//! # ocr-studio
//!
//! Core of an interactive OCR front-end: a deterministic image preprocessing
//! pipeline (grayscale, denoise, threshold, rotation) plus an invocation
//! layer that turns user-chosen parameters into Tesseract configuration and
//! runs the engine with a hard timeout and language/availability checks.
//!
//! The interactive UI, upload transport, and the recognition algorithm itself
//! live elsewhere; this crate owns everything between raw uploaded bytes and
//! extracted text.

pub mod config;
pub mod engine;
pub mod engine_config;
pub mod errors;
pub mod input;
pub mod invoker;
pub mod languages;
pub mod pdf;
pub mod pipeline;
pub mod preprocessing;
pub mod process;

// Re-export the request-level types for easier access
pub use config::AppConfig;
pub use engine::{Engine, EngineVersion};
pub use engine_config::{EngineMode, EngineParams, PageSegMode};
pub use errors::{AppResult, OcrError};
pub use input::RawImage;
pub use preprocessing::{PreprocessConfig, Rotation90};
