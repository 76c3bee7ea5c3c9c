//! Image preprocessing for OCR.
//!
//! Screenshots are converted to grayscale, upscaled when small, denoised
//! with a median filter and binarized with an Otsu threshold.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, GrayImage, Luma};
use imageproc::contrast::otsu_level;
use imageproc::filter::median_filter;
use tracing::debug;

use crate::error::OcrError;
use crate::models::config::PreprocessConfig;

/// Image preprocessor for the OCR pipeline.
#[derive(Debug, Clone)]
pub struct ImagePreprocessor {
    config: PreprocessConfig,
}

impl ImagePreprocessor {
    /// Create a new preprocessor with default settings.
    pub fn new() -> Self {
        Self::from_config(PreprocessConfig::default())
    }

    pub fn from_config(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Disable every step; images pass through unchanged.
    pub fn disabled() -> Self {
        Self::from_config(PreprocessConfig {
            enabled: false,
            ..Default::default()
        })
    }

    /// Prepare an image for text recognition.
    pub fn process(&self, image: &DynamicImage) -> Result<DynamicImage, OcrError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(OcrError::InvalidImage(format!(
                "image has no pixels ({}x{})",
                width, height
            )));
        }

        if !self.config.enabled {
            return Ok(image.clone());
        }

        let mut gray = image.to_luma8();

        if let Some((new_width, new_height)) = self.upscaled_dimensions(width, height)? {
            debug!(
                "Upscaling {}x{} to {}x{}",
                width, height, new_width, new_height
            );
            gray = image::imageops::resize(&gray, new_width, new_height, FilterType::CatmullRom);
        }

        if self.config.median_radius > 0 {
            gray = median_filter(&gray, self.config.median_radius, self.config.median_radius);
        }

        if self.config.binarize {
            let level = otsu_level(&gray);
            debug!("Otsu threshold: {}", level);
            gray = binarize(&gray, level);
        }

        Ok(DynamicImage::ImageLuma8(gray))
    }

    /// Target size when the longer side is under the upscale limit.
    fn upscaled_dimensions(&self, width: u32, height: u32) -> Result<Option<(u32, u32)>, OcrError> {
        let scale = self.config.scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(OcrError::Preprocessing(format!(
                "invalid upscale factor {}",
                scale
            )));
        }

        if width.max(height) >= self.config.upscale_below || scale <= 1.0 {
            return Ok(None);
        }

        let new_width = (width as f32 * scale).round() as u32;
        let new_height = (height as f32 * scale).round() as u32;
        Ok(Some((new_width.max(1), new_height.max(1))))
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Pixels above `level` become white, the rest black.
fn binarize(image: &GrayImage, level: u8) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut result = GrayImage::new(width, height);

    for (x, y, pixel) in image.enumerate_pixels() {
        let output = if pixel[0] > level { 255 } else { 0 };
        result.put_pixel(x, y, Luma([output]));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn two_tone(width: u32, height: u32) -> DynamicImage {
        let mut image = RgbImage::new(width, height);
        for (x, _, pixel) in image.enumerate_pixels_mut() {
            *pixel = if x < width / 2 {
                image::Rgb([30, 30, 30])
            } else {
                image::Rgb([220, 220, 220])
            };
        }
        DynamicImage::ImageRgb8(image)
    }

    #[test]
    fn test_small_image_is_upscaled_and_binarized() {
        let processed = ImagePreprocessor::new().process(&two_tone(40, 20)).unwrap();

        assert_eq!(processed.dimensions(), (80, 40));
        let gray = processed.to_luma8();
        assert!(gray.pixels().all(|p| p[0] == 0 || p[0] == 255));
        assert_eq!(gray.get_pixel(5, 5)[0], 0);
        assert_eq!(gray.get_pixel(75, 5)[0], 255);
    }

    #[test]
    fn test_large_image_keeps_size() {
        let config = PreprocessConfig {
            upscale_below: 30,
            ..Default::default()
        };
        let processed = ImagePreprocessor::from_config(config)
            .process(&two_tone(40, 20))
            .unwrap();

        assert_eq!(processed.dimensions(), (40, 20));
    }

    #[test]
    fn test_disabled_passes_through() {
        let image = two_tone(10, 10);
        let processed = ImagePreprocessor::disabled().process(&image).unwrap();

        assert_eq!(processed.to_rgb8().get_pixel(2, 2), image.to_rgb8().get_pixel(2, 2));
    }

    #[test]
    fn test_invalid_scale() {
        let config = PreprocessConfig {
            scale: 0.0,
            ..Default::default()
        };
        let result = ImagePreprocessor::from_config(config).process(&two_tone(10, 10));

        assert!(matches!(result, Err(OcrError::Preprocessing(_))));
    }

    #[test]
    fn test_empty_image_rejected() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        let result = ImagePreprocessor::new().process(&image);

        assert!(matches!(result, Err(OcrError::InvalidImage(_))));
    }
}
