mod core;
mod processors;
mod utils;

pub use crate::core::{
    validate_config, AnimationLoader, Extension, ImageLoader, ImageLoaderError, Loader,
    LoaderConfig, MediaCache, MediaKind, ResizeAlgorithm, Result,
};
pub use crate::processors::{
    convert, convert_for, Animation, AnimationFrame, DirectoryResources, EmbeddedResources,
    Encoder, Fetcher, GifDecoder, HttpFetcher, MediaDecoder, PixelFormat, PreloadStats, Preloader,
    Resizer, ResourceProvider, Source, SourceResolver, StillDecoder,
};

pub mod prelude {
    pub use crate::{
        AnimationLoader, Encoder, Extension, ImageLoader, LoaderConfig, MediaCache, Preloader,
        Resizer,
    };
}

// Re-export commonly used types
pub use image::DynamicImage;
