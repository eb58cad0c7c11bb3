// imgcache/src/core/mod.rs
pub mod cache;
pub mod extension;
pub mod loader;

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub use cache::MediaCache;
pub use extension::Extension;
pub use loader::{AnimationLoader, ImageLoader, Loader};

const MAX_DIMENSION: u32 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResizeAlgorithm {
    Nearest,
    Bilinear,
    Bicubic,
    Lanczos3,
}

impl Default for ResizeAlgorithm {
    fn default() -> Self {
        ResizeAlgorithm::Bicubic
    }
}

/// Which family of media a loader produces. Decides the accepted extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Still,
    Animation,
}

impl MediaKind {
    pub fn supported_extensions(&self) -> &'static [Extension] {
        match self {
            MediaKind::Still => Extension::ALL,
            MediaKind::Animation => &[Extension::Gif],
        }
    }

    pub fn supports(&self, extension: Extension) -> bool {
        self.supported_extensions().contains(&extension)
    }
}

#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub max_dimensions: Option<(u32, u32)>,
    pub http_timeout: Option<Duration>,
    pub user_agent: String,
    pub resource_root: PathBuf,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_dimensions: Some((MAX_DIMENSION, MAX_DIMENSION)),
            http_timeout: None,
            user_agent: concat!("imgcache/", env!("CARGO_PKG_VERSION")).to_string(),
            resource_root: PathBuf::from("."),
        }
    }
}

impl LoaderConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some((width, height)) = self.max_dimensions {
            if width == 0 || height == 0 {
                return Err(ImageLoaderError::InvalidParameter(
                    "Maximum dimensions must be non-zero".to_string(),
                ));
            }

            if width > MAX_DIMENSION || height > MAX_DIMENSION {
                return Err(ImageLoaderError::InvalidParameter(
                    "Dimensions too large (max 100,000 pixels)".to_string(),
                ));
            }
        }

        if self.http_timeout == Some(Duration::ZERO) {
            return Err(ImageLoaderError::InvalidParameter(
                "HTTP timeout must be greater than zero".to_string(),
            ));
        }

        if self.user_agent.trim().is_empty() {
            return Err(ImageLoaderError::InvalidParameter(
                "User agent cannot be blank".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ImageLoaderError {
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Missing extension: {0}")]
    MissingExtension(String),

    #[error("Unsupported extension: {0}")]
    UnsupportedExtension(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode {path}: {reason}")]
    DecodeFailed { path: String, reason: String },

    #[error("Invalid dimensions {width}x{height}: width and height must be positive")]
    InvalidDimensions { width: i64, height: i64 },

    #[error("Dimension limit exceeded: {0}")]
    DimensionLimitExceeded(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Encoding error: {0}")]
    Encode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, ImageLoaderError>;

pub fn validate_config(config: &LoaderConfig) -> Result<()> {
    config.validate()
}
