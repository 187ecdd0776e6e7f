//! # Fixed-Level Thresholding
//!
//! Binarization at a user-chosen level. The stage always operates on
//! single-channel luminance: when the grayscale stage was skipped, the input
//! is converted internally, so per-channel thresholding never happens.
//!
//! Convention: pixels below the level become black (0), pixels at or above it
//! become white (255). The white-pixel count is therefore non-increasing as
//! the level rises.

use image::DynamicImage;
use tracing;

/// Applies fixed-level binarization to separate text from background.
///
/// The input is converted to single-channel luminance first, so per-channel
/// thresholding never happens even when the grayscale stage was skipped.
///
/// # Arguments
///
/// * `image` - The input image to binarize
/// * `level` - Threshold level, 0..=255; pixels below it become black (0),
///   pixels at or above it become white (255)
///
/// # Returns
///
/// Returns a single-channel image containing only the values 0 and 255.
pub fn apply_threshold(image: &DynamicImage, level: u8) -> DynamicImage {
    let start_time = std::time::Instant::now();
    let gray = image.to_luma8();

    let mut binary = image::GrayImage::new(gray.width(), gray.height());
    for (x, y, pixel) in gray.enumerate_pixels() {
        let value = if pixel[0] < level { 0u8 } else { 255u8 };
        binary.put_pixel(x, y, image::Luma([value]));
    }

    tracing::debug!(
        target: "ocr_preprocessing",
        "thresholding completed in {}ms: level={}, dimensions={}x{}",
        start_time.elapsed().as_millis(),
        level,
        gray.width(),
        gray.height()
    );

    DynamicImage::ImageLuma8(binary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GrayImage;

    fn gradient_image() -> DynamicImage {
        let img = GrayImage::from_fn(16, 16, |x, y| image::Luma([(x * 16 + y) as u8]));
        DynamicImage::ImageLuma8(img)
    }

    fn count_white(image: &DynamicImage) -> usize {
        image
            .to_luma8()
            .pixels()
            .filter(|pixel| pixel[0] == 255)
            .count()
    }

    #[test]
    fn test_output_is_strictly_binary() {
        let result = apply_threshold(&gradient_image(), 128);
        for pixel in result.to_luma8().pixels() {
            assert!(pixel[0] == 0 || pixel[0] == 255);
        }
    }

    #[test]
    fn test_pixels_at_level_become_white() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, image::Luma([128])));
        let result = apply_threshold(&img, 128);
        assert_eq!(count_white(&result), 16);

        let result = apply_threshold(&img, 129);
        assert_eq!(count_white(&result), 0);
    }

    #[test]
    fn test_white_count_non_increasing_in_level() {
        let img = gradient_image();
        let mut previous = count_white(&apply_threshold(&img, 0));
        for level in [1, 32, 64, 128, 192, 255] {
            let white = count_white(&apply_threshold(&img, level));
            assert!(
                white <= previous,
                "white count rose from {} to {} at level {}",
                previous,
                white,
                level
            );
            previous = white;
        }
    }

    #[test]
    fn test_rgb_input_is_forced_to_luminance() {
        let rgb = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            8,
            8,
            image::Rgb([200, 10, 10]),
        ));
        let result = apply_threshold(&rgb, 128);
        assert!(matches!(result, DynamicImage::ImageLuma8(_)));
    }
}
