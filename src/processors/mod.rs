// imgcache/src/processors/mod.rs
mod batch;
mod converter;
mod decoder;
mod encoder;
mod resizer;
mod source;

pub use batch::{PreloadStats, Preloader};
pub use converter::{convert, convert_for, PixelFormat};
pub use decoder::{Animation, AnimationFrame, GifDecoder, MediaDecoder, StillDecoder};
pub use encoder::Encoder;
pub use resizer::Resizer;
pub use source::{
    DirectoryResources, EmbeddedResources, Fetcher, HttpFetcher, ResourceProvider, Source,
    SourceResolver,
};
