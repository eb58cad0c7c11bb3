// imgcache/src/processors/converter.rs
use crate::core::Extension;
use image::{ColorType, DynamicImage};
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    pub fn of(image: &DynamicImage) -> Option<Self> {
        match image.color() {
            ColorType::Rgb8 => Some(PixelFormat::Rgb8),
            ColorType::Rgba8 => Some(PixelFormat::Rgba8),
            _ => None,
        }
    }

    pub fn for_extension(extension: Extension) -> Self {
        if extension.supports_transparency() {
            PixelFormat::Rgba8
        } else {
            PixelFormat::Rgb8
        }
    }
}

/// Redraws `image` into `target`. Borrows when it already matches.
pub fn convert(image: &DynamicImage, target: PixelFormat) -> Cow<'_, DynamicImage> {
    if PixelFormat::of(image) == Some(target) {
        return Cow::Borrowed(image);
    }

    log::debug!("Converting {:?} image to {:?}", image.color(), target);

    Cow::Owned(match target {
        PixelFormat::Rgb8 => DynamicImage::ImageRgb8(image.to_rgb8()),
        PixelFormat::Rgba8 => DynamicImage::ImageRgba8(image.to_rgba8()),
    })
}

pub fn convert_for(image: &DynamicImage, extension: Extension) -> Cow<'_, DynamicImage> {
    convert(image, PixelFormat::for_extension(extension))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_format_is_borrowed() {
        let image = DynamicImage::new_rgb8(2, 2);
        assert!(matches!(convert(&image, PixelFormat::Rgb8), Cow::Borrowed(_)));
    }

    #[test]
    fn test_drops_alpha_for_jpeg() {
        let image = DynamicImage::new_rgba8(3, 2);
        let converted = convert_for(&image, Extension::Jpeg);

        assert_eq!(converted.color(), ColorType::Rgb8);
        assert_eq!((converted.width(), converted.height()), (3, 2));
    }

    #[test]
    fn test_adds_alpha_for_png() {
        let image = DynamicImage::new_luma8(2, 2);
        let converted = convert_for(&image, Extension::Png);
        assert_eq!(converted.color(), ColorType::Rgba8);
    }
}
