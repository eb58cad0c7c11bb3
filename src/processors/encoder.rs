// imgcache/src/processors/encoder.rs
use super::converter::convert_for;
use crate::core::{Extension, ImageLoaderError, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use oxipng::{optimize_from_memory, Options};
use std::io::Cursor;

const DEFAULT_JPEG_QUALITY: f32 = 0.75;

pub struct Encoder {
    optimize_png: bool,
}

impl Encoder {
    pub fn new() -> Self {
        Self {
            optimize_png: false,
        }
    }

    pub fn with_png_optimization(mut self, optimize: bool) -> Self {
        self.optimize_png = optimize;
        self
    }

    /// Encodes `image` as `extension`.
    ///
    /// `quality` only applies to lossy formats and is ignored unless it lies
    /// in `[0, 1]`.
    pub fn encode(
        &self,
        image: &DynamicImage,
        extension: Extension,
        quality: Option<f32>,
    ) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());

        match extension {
            Extension::Jpeg | Extension::Jpg => {
                let quality = quality
                    .filter(|q| (0.0..=1.0).contains(q))
                    .unwrap_or(DEFAULT_JPEG_QUALITY);
                let quality = (quality * 100.0).round().clamp(1.0, 100.0) as u8;

                let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
                convert_for(image, extension).write_with_encoder(encoder)?;
            }
            Extension::Hdr => {
                let image = DynamicImage::ImageRgb32F(image.to_rgb32f());
                image.write_to(&mut buffer, extension.image_format())?;
            }
            Extension::Png => {
                convert_for(image, extension).write_to(&mut buffer, extension.image_format())?;
                if self.optimize_png {
                    return self.optimize_png_bytes(&buffer.into_inner());
                }
            }
            _ => {
                convert_for(image, extension).write_to(&mut buffer, extension.image_format())?;
            }
        }

        let bytes = buffer.into_inner();
        log::debug!(
            "Encoded {}x{} image as {} ({})",
            image.width(),
            image.height(),
            extension,
            crate::utils::format_file_size(bytes.len() as u64)
        );

        Ok(bytes)
    }

    /// Encodes into a `data:image/<ext>;base64,...` URI.
    pub fn to_base64(
        &self,
        image: &DynamicImage,
        extension: Extension,
        quality: Option<f32>,
    ) -> Result<String> {
        let bytes = self.encode(image, extension, quality)?;
        Ok(format!(
            "data:image/{};base64,{}",
            extension.as_str(),
            STANDARD.encode(bytes)
        ))
    }

    fn optimize_png_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        let optimized = optimize_from_memory(data, &Options::default())
            .map_err(|e| ImageLoaderError::Encode(format!("PNG optimization failed: {}", e)))?;

        log::debug!(
            "Optimized PNG from {} to {} bytes",
            data.len(),
            optimized.len()
        );

        Ok(optimized)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}
