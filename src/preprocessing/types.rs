//! Shared types for the preprocessing pipeline.

use serde::{Deserialize, Serialize};

use crate::errors::{AppResult, OcrError};

/// Allowed denoising strength range (inclusive)
pub const DENOISE_STRENGTH_RANGE: (u8, u8) = (1, 40);

/// Allowed free-rotation angle range in degrees (inclusive)
pub const FREE_ANGLE_RANGE: (f32, f32) = (-180.0, 180.0);

/// Rectangular rotation step, a lossless multiple of 90 degrees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation90 {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation90 {
    /// Build from a degree value restricted to {0, 90, 180, 270}
    pub fn from_degrees(degrees: u32) -> AppResult<Self> {
        match degrees {
            0 => Ok(Rotation90::Deg0),
            90 => Ok(Rotation90::Deg90),
            180 => Ok(Rotation90::Deg180),
            270 => Ok(Rotation90::Deg270),
            other => Err(OcrError::Config(format!(
                "rectangular rotation must be one of 0/90/180/270, got {}",
                other
            ))),
        }
    }

    pub fn degrees(self) -> u32 {
        match self {
            Rotation90::Deg0 => 0,
            Rotation90::Deg90 => 90,
            Rotation90::Deg180 => 180,
            Rotation90::Deg270 => 270,
        }
    }
}

/// Ordered set of enabled preprocessing transforms and their parameters.
///
/// Immutable per preprocessing run; a UI rebuilds a fresh value whenever a
/// control changes, and "reset to defaults" is `PreprocessConfig::default()`.
/// Stage order is fixed and not user-reorderable (see `preprocess`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// Collapse to single-channel luminance
    pub grayscale: bool,
    /// Gaussian smoothing to reduce speckle noise
    pub denoise: bool,
    /// Denoising strength, 1..=40, higher is more aggressive
    pub denoise_strength: u8,
    /// Binarize at a fixed level
    pub threshold: bool,
    /// Threshold level, 0..=255; pixels below become black, at/above white
    pub threshold_level: u8,
    /// Rotate in 90-degree steps
    pub rotate90: bool,
    /// Rectangular rotation step
    pub angle90: Rotation90,
    /// Rotate by an arbitrary angle
    pub rotate_free: bool,
    /// Free rotation angle in degrees, -180.0..=180.0, positive is clockwise
    pub angle: f32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            grayscale: true,
            denoise: false,
            denoise_strength: 10,
            threshold: false,
            threshold_level: 128,
            rotate90: false,
            angle90: Rotation90::Deg0,
            rotate_free: false,
            angle: 0.0,
        }
    }
}

impl PreprocessConfig {
    /// A config with every stage disabled (identity transform)
    pub fn all_disabled() -> Self {
        Self {
            grayscale: false,
            ..Self::default()
        }
    }

    /// Validate parameter ranges
    pub fn validate(&self) -> AppResult<()> {
        let (min_strength, max_strength) = DENOISE_STRENGTH_RANGE;
        if self.denoise_strength < min_strength || self.denoise_strength > max_strength {
            return Err(OcrError::Config(format!(
                "denoise_strength {} out of range [{}, {}]",
                self.denoise_strength, min_strength, max_strength
            )));
        }

        let (min_angle, max_angle) = FREE_ANGLE_RANGE;
        if !self.angle.is_finite() || self.angle < min_angle || self.angle > max_angle {
            return Err(OcrError::Config(format!(
                "free rotation angle {} out of range [{}, {}]",
                self.angle, min_angle, max_angle
            )));
        }

        Ok(())
    }
}
