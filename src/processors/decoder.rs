// imgcache/src/processors/decoder.rs
use crate::core::{Extension, ImageLoaderError, MediaKind, Result};
use image::codecs::gif;
use image::{AnimationDecoder, Delay, DynamicImage, GenericImageView, ImageDecoder, ImageReader, RgbaImage};
use std::io::Cursor;
use std::time::Duration;

fn check_dimensions(limit: Option<(u32, u32)>, width: u32, height: u32) -> Result<()> {
    if let Some((max_w, max_h)) = limit {
        if width > max_w || height > max_h {
            return Err(ImageLoaderError::DimensionLimitExceeded(format!(
                "Image dimensions {}x{} exceed maximum {}x{}",
                width, height, max_w, max_h
            )));
        }
    }
    Ok(())
}

/// Turns fetched bytes into a cached media handle.
pub trait MediaDecoder: Send + Sync {
    type Handle: PartialEq + Send + Sync;

    const KIND: MediaKind;

    fn decode(&self, bytes: &[u8], extension: Extension) -> Result<Self::Handle>;
}

#[derive(Debug, Clone)]
pub struct StillDecoder {
    max_dimensions: Option<(u32, u32)>,
}

impl StillDecoder {
    pub fn new() -> Self {
        Self {
            max_dimensions: Some((100_000, 100_000)),
        }
    }

    pub fn with_max_dimensions(mut self, width: u32, height: u32) -> Self {
        self.max_dimensions = Some((width, height));
        self
    }

    pub fn without_limits(mut self) -> Self {
        self.max_dimensions = None;
        self
    }
}

impl Default for StillDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaDecoder for StillDecoder {
    type Handle = DynamicImage;

    const KIND: MediaKind = MediaKind::Still;

    fn decode(&self, bytes: &[u8], extension: Extension) -> Result<DynamicImage> {
        if bytes.is_empty() {
            return Err(ImageLoaderError::InvalidParameter("Image data is empty".to_string()));
        }

        let mut reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
        if reader.format().is_none() {
            log::debug!("Could not sniff format, falling back to {}", extension);
            reader.set_format(extension.image_format());
        }

        let image = reader.decode()?;

        let (width, height) = image.dimensions();
        check_dimensions(self.max_dimensions, width, height)?;

        log::info!(
            "Decoded image: {}x{} pixels, format: {:?}",
            width,
            height,
            image.color()
        );

        Ok(image)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationFrame {
    pub image: RgbaImage,
    pub left: u32,
    pub top: u32,
    pub delay: Delay,
}

impl AnimationFrame {
    pub fn duration(&self) -> Duration {
        Duration::from(self.delay)
    }
}

/// A fully decoded GIF: logical screen size plus every frame in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    pub width: u32,
    pub height: u32,
    pub frames: Vec<AnimationFrame>,
}

impl Animation {
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn first_frame(&self) -> Option<&AnimationFrame> {
        self.frames.first()
    }

    pub fn total_duration(&self) -> Duration {
        self.frames.iter().map(AnimationFrame::duration).sum()
    }
}

#[derive(Debug, Clone)]
pub struct GifDecoder {
    max_dimensions: Option<(u32, u32)>,
}

impl GifDecoder {
    pub fn new() -> Self {
        Self {
            max_dimensions: Some((100_000, 100_000)),
        }
    }

    /// Caps the logical screen size, checked before any frame is decoded.
    pub fn with_max_dimensions(mut self, width: u32, height: u32) -> Self {
        self.max_dimensions = Some((width, height));
        self
    }

    pub fn without_limits(mut self) -> Self {
        self.max_dimensions = None;
        self
    }
}

impl Default for GifDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaDecoder for GifDecoder {
    type Handle = Animation;

    const KIND: MediaKind = MediaKind::Animation;

    fn decode(&self, bytes: &[u8], _extension: Extension) -> Result<Animation> {
        let decoder = gif::GifDecoder::new(Cursor::new(bytes))?;
        let (width, height) = decoder.dimensions();
        check_dimensions(self.max_dimensions, width, height)?;

        let frames = decoder
            .into_frames()
            .collect_frames()?
            .into_iter()
            .map(|frame| AnimationFrame {
                left: frame.left(),
                top: frame.top(),
                delay: frame.delay(),
                image: frame.into_buffer(),
            })
            .collect::<Vec<_>>();

        if frames.is_empty() {
            return Err(ImageLoaderError::InvalidParameter(
                "Animation contains no frames".to_string(),
            ));
        }

        log::info!(
            "Decoded animation: {}x{} pixels, {} frames",
            width,
            height,
            frames.len()
        );

        Ok(Animation {
            width,
            height,
            frames,
        })
    }
}
