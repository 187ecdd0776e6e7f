//! # Rotation Stages
//!
//! Two independent rotation stages share one angle convention: positive
//! angles rotate clockwise. The rectangular stage is a lossless 90-degree
//! step rotation; the free stage warps bilinearly onto a canvas expanded to
//! the rotated bounding box, filling exposed corners with white. Applying a
//! 90-degree step followed by a free rotation composes into a single net
//! rotation by the summed angle.

use image::{DynamicImage, Luma, Rgba};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};
use tracing;

use super::types::{Rotation90, FREE_ANGLE_RANGE};
use crate::errors::{AppResult, OcrError};

/// Fill value for corners exposed by free rotation
const CORNER_FILL_LUMA: Luma<u8> = Luma([255u8]);
const CORNER_FILL_RGBA: Rgba<u8> = Rgba([255u8, 255u8, 255u8, 255u8]);

/// Rotates the image clockwise by a lossless multiple of 90 degrees.
///
/// Pixels are permuted, never resampled; dimensions swap on the 90 and 270
/// steps.
///
/// # Arguments
///
/// * `image` - The input image to rotate
/// * `step` - The quarter-turn step to apply
///
/// # Returns
///
/// Returns the rotated image; the zero step is an identity copy.
pub fn rotate_rectangular(image: &DynamicImage, step: Rotation90) -> DynamicImage {
    match step {
        Rotation90::Deg0 => image.clone(),
        Rotation90::Deg90 => image.rotate90(),
        Rotation90::Deg180 => image.rotate180(),
        Rotation90::Deg270 => image.rotate270(),
    }
}

/// Rotates the image clockwise by an arbitrary angle in degrees.
///
/// The output canvas is the bounding box of the rotated image, so no content
/// is cropped for any aspect ratio or angle; corners exposed by the rotation
/// fill with white (document background) and resampling is bilinear.
/// Single-channel input stays single-channel; everything else goes through
/// RGBA.
///
/// The warp maps the source center onto the output center directly. There is
/// no intermediate padded canvas, so non-square images survive angles near
/// the quarter turns, where the rotated bounding box is narrower than the
/// source in one dimension.
///
/// # Arguments
///
/// * `image` - The input image to rotate
/// * `angle_degrees` - Clockwise angle in degrees, -180.0..=180.0
///
/// # Returns
///
/// Returns the rotated image with expanded bounds, or a `Config` error when
/// the angle is outside the accepted range.
pub fn rotate_free(image: &DynamicImage, angle_degrees: f32) -> AppResult<DynamicImage> {
    let (min_angle, max_angle) = FREE_ANGLE_RANGE;
    if !angle_degrees.is_finite() || angle_degrees < min_angle || angle_degrees > max_angle {
        return Err(OcrError::Config(format!(
            "free rotation angle {} out of range [{}, {}]",
            angle_degrees, min_angle, max_angle
        )));
    }
    if angle_degrees == 0.0 {
        return Ok(image.clone());
    }

    let start_time = std::time::Instant::now();
    let theta = angle_degrees.to_radians();
    let (new_width, new_height) = rotated_bounds(image.width(), image.height(), theta);

    // Rotate about the source center, then land that center on the output
    // center. Composing the transform this way keeps every source pixel
    // inside the expanded bounds. Pixels sit at integer coordinates, so the
    // center of a w-wide image is (w - 1) / 2.
    let projection = Projection::translate(
        (new_width - 1) as f32 / 2.0,
        (new_height - 1) as f32 / 2.0,
    ) * Projection::rotate(theta)
        * Projection::translate(
            -((image.width() - 1) as f32) / 2.0,
            -((image.height() - 1) as f32) / 2.0,
        );

    let rotated = match image {
        DynamicImage::ImageLuma8(src) => {
            let mut canvas = image::GrayImage::new(new_width, new_height);
            warp_into(
                src,
                &projection,
                Interpolation::Bilinear,
                CORNER_FILL_LUMA,
                &mut canvas,
            );
            DynamicImage::ImageLuma8(canvas)
        }
        other => {
            let src = other.to_rgba8();
            let mut canvas = image::RgbaImage::new(new_width, new_height);
            warp_into(
                &src,
                &projection,
                Interpolation::Bilinear,
                CORNER_FILL_RGBA,
                &mut canvas,
            );
            DynamicImage::ImageRgba8(canvas)
        }
    };

    tracing::debug!(
        target: "ocr_preprocessing",
        "free rotation completed in {}ms: angle={:.1}, dimensions {}x{} -> {}x{}",
        start_time.elapsed().as_millis(),
        angle_degrees,
        image.width(),
        image.height(),
        new_width,
        new_height
    );

    Ok(rotated)
}

/// Bounding box of a w x h image rotated by theta radians
fn rotated_bounds(width: u32, height: u32, theta: f32) -> (u32, u32) {
    let (sin_t, cos_t) = (theta.sin().abs(), theta.cos().abs());
    let (w, h) = (width as f32, height as f32);
    // The epsilon keeps float noise at exact quarter turns (cos 90 deg is a
    // hair above zero in f32) from inflating the ceil by a pixel.
    let new_width = (w * cos_t + h * sin_t - 1e-3).ceil() as u32;
    let new_height = (w * sin_t + h * cos_t - 1e-3).ceil() as u32;
    (new_width.max(1), new_height.max(1))
}
