//! # Image Preprocessing Pipeline
//!
//! Deterministic, fixed-order pipeline of independently toggleable stages
//! that transforms a raw upload into the image actually submitted to OCR:
//!
//! 1. grayscale — collapse to single-channel luminance
//! 2. denoise — Gaussian smoothing on the luminance
//! 3. threshold — fixed-level binarization
//! 4. rectangular rotation — lossless 90-degree steps
//! 5. free rotation — arbitrary angle, bilinear, white corner fill
//!
//! The order is not user-reorderable: each stage assumes the color and noise
//! characteristics left by the previous one. `preprocess` is pure — same
//! input image and config always produce the same output, which is what makes
//! preview-before-commit cheap for a caller.

pub mod filtering;
pub mod rotation;
pub mod thresholding;
pub mod types;

pub use filtering::denoise;
pub use rotation::{rotate_free, rotate_rectangular};
pub use thresholding::apply_threshold;
pub use types::{PreprocessConfig, Rotation90};

use image::DynamicImage;
use tracing::debug;

use crate::errors::AppResult;

/// Applies the enabled stages of `config` to `image` in pipeline order.
///
/// With every stage disabled this is the identity transform. The input is
/// never mutated; the result is a derived image.
///
/// # Arguments
///
/// * `image` - The uploaded image to prepare for OCR
/// * `config` - Stage toggles and parameters, validated before any stage runs
///
/// # Returns
///
/// Returns the processed image, or a `Config` error when a parameter is out
/// of range.
///
/// # Examples
///
/// ```no_run
/// use ocr_studio::preprocessing::{preprocess, PreprocessConfig};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let img = image::open("receipt.jpg")?;
/// let config = PreprocessConfig {
///     threshold: true,
///     threshold_level: 140,
///     ..PreprocessConfig::default()
/// };
/// let prepared = preprocess(&img, &config)?;
/// # Ok(())
/// # }
/// ```
pub fn preprocess(image: &DynamicImage, config: &PreprocessConfig) -> AppResult<DynamicImage> {
    config.validate()?;
    let start_time = std::time::Instant::now();

    let mut current = image.clone();

    if config.grayscale {
        current = DynamicImage::ImageLuma8(current.to_luma8());
    }
    if config.denoise {
        current = denoise(&current, config.denoise_strength)?;
    }
    if config.threshold {
        current = apply_threshold(&current, config.threshold_level);
    }
    if config.rotate90 {
        current = rotate_rectangular(&current, config.angle90);
    }
    if config.rotate_free {
        current = rotate_free(&current, config.angle)?;
    }

    debug!(
        target: "ocr_preprocessing",
        "preprocessing pipeline completed in {}ms: {}x{} -> {}x{}",
        start_time.elapsed().as_millis(),
        image.width(),
        image.height(),
        current.width(),
        current.height()
    );

    Ok(current)
}
