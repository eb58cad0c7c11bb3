// imgcache/src/processors/batch.rs
use super::decoder::MediaDecoder;
use crate::core::{Extension, ImageLoaderError, Loader, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Default)]
pub struct PreloadStats {
    pub loaded: usize,
    pub failures: Vec<(String, String)>,
}

impl PreloadStats {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Warms a loader's cache with many paths at once.
pub struct Preloader {
    thread_pool: Option<rayon::ThreadPool>,
}

impl Preloader {
    /// `max_threads == 0` runs on rayon's global pool.
    pub fn new(max_threads: usize) -> Result<Self> {
        let mut preloader = Self { thread_pool: None };

        if max_threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(max_threads)
                .build()
                .map_err(|e| {
                    ImageLoaderError::InvalidParameter(format!("Failed to create thread pool: {}", e))
                })?;
            preloader.thread_pool = Some(pool);
        }

        Ok(preloader)
    }

    /// Loads every relative path through [`Loader::load`]. Failures are
    /// collected, never fatal.
    pub fn load_all<D, S>(&self, loader: &Loader<D>, paths: &[S]) -> PreloadStats
    where
        D: MediaDecoder,
        S: AsRef<str>,
    {
        let entries: Vec<(&str, bool)> = paths.iter().map(|p| (p.as_ref(), false)).collect();
        self.run(loader, &entries)
    }

    /// Loads every file under `dir` whose extension the loader accepts.
    pub fn preload_dir<D: MediaDecoder>(
        &self,
        loader: &Loader<D>,
        dir: &Path,
        recursive: bool,
    ) -> Result<PreloadStats> {
        self.validate_dir(dir)?;

        let files = self.collect_paths::<D>(dir, recursive);
        if files.is_empty() {
            log::warn!("No loadable files found in {}", dir.display());
            return Ok(PreloadStats::default());
        }

        log::info!("Preloading {} files from {}", files.len(), dir.display());

        let owned: Vec<String> = files
            .iter()
            .map(|path| path.to_string_lossy().into_owned())
            .collect();
        let entries: Vec<(&str, bool)> = owned.iter().map(|p| (p.as_str(), true)).collect();

        Ok(self.run(loader, &entries))
    }

    fn run<D: MediaDecoder>(&self, loader: &Loader<D>, entries: &[(&str, bool)]) -> PreloadStats {
        let load = || -> Vec<(String, Result<()>)> {
            entries
                .par_iter()
                .map(|(path, is_absolute)| {
                    let result = loader.load(path, *is_absolute).map(|_| ());
                    (path.to_string(), result)
                })
                .collect()
        };

        let results = match &self.thread_pool {
            Some(pool) => pool.install(load),
            None => load(),
        };

        let mut stats = PreloadStats::default();
        for (path, result) in results {
            match result {
                Ok(()) => stats.loaded += 1,
                Err(e) => {
                    log::warn!("Failed to preload {}: {}", path, e);
                    stats.failures.push((path, e.to_string()));
                }
            }
        }

        log::info!(
            "Preloaded {} entries, {} failures",
            stats.loaded,
            stats.failures.len()
        );

        stats
    }

    fn collect_paths<D: MediaDecoder>(&self, dir: &Path, recursive: bool) -> Vec<PathBuf> {
        let walker = if recursive {
            WalkDir::new(dir)
        } else {
            WalkDir::new(dir).max_depth(1)
        };

        walker
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .path()
                    .to_str()
                    .map(|path| Extension::classify(path, D::KIND).is_ok())
                    .unwrap_or(false)
            })
            .map(|entry| entry.into_path())
            .collect()
    }

    fn validate_dir(&self, dir: &Path) -> Result<()> {
        if !dir.exists() {
            return Err(ImageLoaderError::NotFound(dir.display().to_string()));
        }

        if !dir.is_dir() {
            return Err(ImageLoaderError::InvalidPath(format!(
                "Not a directory: {}",
                dir.display()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processors::{EmbeddedResources, Fetcher, SourceResolver, StillDecoder};
    use crate::ImageLoader;
    use image::{DynamicImage, ImageFormat};
    use std::io::Cursor;
    use url::Url;

    struct Offline;

    impl Fetcher for Offline {
        fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
            Err(ImageLoaderError::Network(format!("offline: {}", url)))
        }
    }

    fn png(size: u32) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::new_rgb8(size, size)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    fn loader(resources: EmbeddedResources) -> ImageLoader {
        Loader::new(StillDecoder::new(), SourceResolver::new(Offline, resources))
    }

    #[test]
    fn test_load_all_collects_failures() {
        let resources = EmbeddedResources::new()
            .with("a.png", png(2))
            .with("b.png", png(3));
        let loader = loader(resources);

        let stats = Preloader::new(2)
            .unwrap()
            .load_all(&loader, &["a.png", "b.png", "missing.png", "bad.txt"]);

        assert_eq!(stats.loaded, 2);
        assert_eq!(stats.failures.len(), 2);
        assert!(!stats.is_complete());
        assert_eq!(loader.cache().len(), 2);
    }

    #[test]
    fn test_preload_dir_filters_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), png(2)).unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"hello").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/b.png"), png(4)).unwrap();
        let loader = loader(EmbeddedResources::new());
        let preloader = Preloader::new(0).unwrap();

        let stats = preloader.preload_dir(&loader, dir.path(), false).unwrap();
        assert_eq!(stats.loaded, 1);
        assert!(stats.is_complete());

        let stats = preloader.preload_dir(&loader, dir.path(), true).unwrap();
        assert_eq!(stats.loaded, 2);
        assert_eq!(loader.cache().len(), 2);
    }

    #[test]
    fn test_preload_dir_rejects_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let loader = loader(EmbeddedResources::new());
        let preloader = Preloader::new(0).unwrap();

        assert!(matches!(
            preloader.preload_dir(&loader, &dir.path().join("missing"), true),
            Err(ImageLoaderError::NotFound(_))
        ));
    }
}
