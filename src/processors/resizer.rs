// imgcache/src/processors/resizer.rs
use crate::core::{ImageLoaderError, ResizeAlgorithm, Result};
use image::{imageops::FilterType, DynamicImage};

#[derive(Debug, Clone, Copy, Default)]
pub struct Resizer {
    algorithm: ResizeAlgorithm,
}

impl Resizer {
    pub fn new(algorithm: ResizeAlgorithm) -> Self {
        Self { algorithm }
    }

    /// Resizes to exactly `width` x `height`, ignoring the aspect ratio.
    pub fn resize(&self, image: &DynamicImage, width: i64, height: i64) -> Result<DynamicImage> {
        let (width, height) = validate_dimensions(width, height)?;

        if width == image.width() && height == image.height() {
            log::debug!("Image dimensions unchanged, skipping resize");
            return Ok(image.clone());
        }

        log::debug!(
            "Resizing image from {}x{} to {}x{}",
            image.width(),
            image.height(),
            width,
            height
        );

        Ok(image.resize_exact(width, height, self.filter_type()))
    }

    pub fn resize_square(&self, image: &DynamicImage, size: i64) -> Result<DynamicImage> {
        self.resize(image, size, size)
    }

    /// Multiplies both sides by `factor`, rounding down.
    pub fn scale(&self, image: &DynamicImage, factor: f64) -> Result<DynamicImage> {
        let width = (image.width() as f64 * factor).floor() as i64;
        let height = (image.height() as f64 * factor).floor() as i64;
        self.resize(image, width, height)
    }

    fn filter_type(&self) -> FilterType {
        match self.algorithm {
            ResizeAlgorithm::Nearest => FilterType::Nearest,
            ResizeAlgorithm::Bilinear => FilterType::Triangle,
            ResizeAlgorithm::Bicubic => FilterType::CatmullRom,
            ResizeAlgorithm::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

fn validate_dimensions(width: i64, height: i64) -> Result<(u32, u32)> {
    let invalid = || ImageLoaderError::InvalidDimensions { width, height };

    if width <= 0 || height <= 0 {
        return Err(invalid());
    }

    Ok((
        u32::try_from(width).map_err(|_| invalid())?,
        u32::try_from(height).map_err(|_| invalid())?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> DynamicImage {
        DynamicImage::new_rgba8(10, 6)
    }

    #[test]
    fn test_resize_exact_dimensions() {
        let resized = Resizer::default().resize(&image(), 7, 13).unwrap();
        assert_eq!((resized.width(), resized.height()), (7, 13));
    }

    #[test]
    fn test_resize_rejects_non_positive() {
        let resizer = Resizer::default();

        for (width, height) in [(0, 10), (-1, 10), (10, 0), (10, -5)] {
            assert!(matches!(
                resizer.resize(&image(), width, height),
                Err(ImageLoaderError::InvalidDimensions { .. })
            ));
        }
    }

    #[test]
    fn test_resize_square() {
        let resized = Resizer::new(ResizeAlgorithm::Lanczos3)
            .resize_square(&image(), 4)
            .unwrap();
        assert_eq!((resized.width(), resized.height()), (4, 4));
    }

    #[test]
    fn test_scale_rounds_down() {
        let resizer = Resizer::new(ResizeAlgorithm::Bilinear);

        let scaled = resizer.scale(&image(), 0.55).unwrap();
        assert_eq!((scaled.width(), scaled.height()), (5, 3));

        let scaled = resizer.scale(&image(), 2.0).unwrap();
        assert_eq!((scaled.width(), scaled.height()), (20, 12));
    }

    #[test]
    fn test_scale_to_nothing_fails() {
        assert!(Resizer::default().scale(&image(), 0.05).is_err());
        assert!(Resizer::default().scale(&image(), -1.0).is_err());
    }
}
