// imgcache/src/core/loader.rs
use super::{Extension, ImageLoaderError, LoaderConfig, MediaCache, Result};
use crate::processors::{GifDecoder, MediaDecoder, SourceResolver, StillDecoder};
use crate::utils::{ensure_not_blank, truncate};
use std::sync::Arc;

pub type ImageLoader = Loader<StillDecoder>;
pub type AnimationLoader = Loader<GifDecoder>;

/// Loads media by path string and keeps every successful decode in a cache.
///
/// A cached path is served without touching the source or the decoder.
/// Two threads missing on the same path both load it; the last write wins.
pub struct Loader<D: MediaDecoder> {
    decoder: D,
    resolver: SourceResolver,
    cache: Arc<MediaCache<D::Handle>>,
}

impl Loader<StillDecoder> {
    pub fn for_images(config: LoaderConfig) -> Result<Self> {
        config.validate()?;

        let decoder = match config.max_dimensions {
            Some((width, height)) => StillDecoder::new().with_max_dimensions(width, height),
            None => StillDecoder::new().without_limits(),
        };

        Ok(Self::new(decoder, SourceResolver::from_config(&config)?))
    }
}

impl Loader<GifDecoder> {
    pub fn for_animations(config: LoaderConfig) -> Result<Self> {
        config.validate()?;

        let decoder = match config.max_dimensions {
            Some((width, height)) => GifDecoder::new().with_max_dimensions(width, height),
            None => GifDecoder::new().without_limits(),
        };

        Ok(Self::new(decoder, SourceResolver::from_config(&config)?))
    }
}

impl<D: MediaDecoder> Loader<D> {
    pub fn new(decoder: D, resolver: SourceResolver) -> Self {
        Self::with_cache(decoder, resolver, Arc::new(MediaCache::new()))
    }

    /// Builds a loader on top of a cache owned elsewhere.
    pub fn with_cache(
        decoder: D,
        resolver: SourceResolver,
        cache: Arc<MediaCache<D::Handle>>,
    ) -> Self {
        Self {
            decoder,
            resolver,
            cache,
        }
    }

    pub fn cache(&self) -> &Arc<MediaCache<D::Handle>> {
        &self.cache
    }

    pub fn load(&self, path: &str, is_absolute: bool) -> Result<Arc<D::Handle>> {
        ensure_not_blank(path)?;

        if let Some(handle) = self.cache.get(path) {
            log::debug!("Cache hit: {}", truncate(path));
            return Ok(handle);
        }

        log::debug!("Cache miss: {}", truncate(path));
        self.reload(path, is_absolute)
    }

    /// Fetches and decodes `path` again, overwriting any cached entry.
    /// Nothing is cached when any step fails.
    pub fn reload(&self, path: &str, is_absolute: bool) -> Result<Arc<D::Handle>> {
        ensure_not_blank(path)?;

        let extension = Extension::classify(path, D::KIND)?;
        let bytes = self.resolver.resolve(path, is_absolute)?;

        let handle = self
            .decoder
            .decode(&bytes, extension)
            .map_err(|e| match e {
                err @ ImageLoaderError::DimensionLimitExceeded(_) => err,
                other => ImageLoaderError::DecodeFailed {
                    path: truncate(path),
                    reason: other.to_string(),
                },
            })?;

        let handle = Arc::new(handle);
        self.cache.put(path, Arc::clone(&handle));

        log::info!("Loaded {} ({} bytes)", truncate(path), bytes.len());
        Ok(handle)
    }

    /// Stores a handle produced elsewhere, returning whatever it displaced.
    pub fn add(&self, path: impl Into<String>, handle: impl Into<Arc<D::Handle>>) -> Option<Arc<D::Handle>> {
        self.cache.put(path, handle)
    }
}
