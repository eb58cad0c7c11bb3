// imgcache/src/processors/source.rs
use crate::core::{ImageLoaderError, LoaderConfig, Result};
use crate::utils::{
    ensure_not_blank, is_data_uri, is_remote_url, strip_leading_slashes, truncate,
    BASE64_MARKER, DATA_URI_PREFIX,
};
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use url::Url;

/// Standard alphabet that accepts payloads with or without `=` padding.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Where the bytes behind a path string come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    File(PathBuf),
    Remote(Url),
    DataUri { subtype: String, payload: String },
    Resource(String),
}

impl Source {
    /// Picks the retrieval strategy for `path`. An absolute flag always wins,
    /// then `http(s)://`, then `data:image/`, else a bundled resource name.
    pub fn classify(path: &str, is_absolute: bool) -> Result<Self> {
        ensure_not_blank(path)?;

        if is_absolute {
            return Ok(Source::File(PathBuf::from(path)));
        }

        if is_remote_url(path) {
            let url = Url::parse(path)
                .map_err(|e| ImageLoaderError::InvalidPath(format!("{}: {}", path, e)))?;
            return Ok(Source::Remote(url));
        }

        if is_data_uri(path) {
            let rest = &path[DATA_URI_PREFIX.len()..];
            let (header, payload) = rest.split_once(',').ok_or_else(|| {
                ImageLoaderError::InvalidPath(format!("Data URI has no payload: {}", truncate(path)))
            })?;
            let subtype = header.strip_suffix(BASE64_MARKER).ok_or_else(|| {
                ImageLoaderError::InvalidPath(format!(
                    "Data URI is not base64 encoded: {}",
                    truncate(path)
                ))
            })?;

            return Ok(Source::DataUri {
                subtype: subtype.to_string(),
                payload: payload.to_string(),
            });
        }

        Ok(Source::Resource(strip_leading_slashes(path).to_string()))
    }
}

pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>>;
}

pub trait ResourceProvider: Send + Sync {
    /// `Ok(None)` when no resource has that name.
    fn lookup(&self, name: &str) -> Result<Option<Vec<u8>>>;
}

pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(config: &LoaderConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| {
                ImageLoaderError::Network(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        log::debug!("Fetching from network: {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| ImageLoaderError::Network(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageLoaderError::Network(format!(
                "{} returned HTTP {}",
                url,
                status.as_u16()
            )));
        }

        let body = response
            .bytes()
            .map_err(|e| ImageLoaderError::Network(format!("{}: {}", url, e)))?;

        Ok(body.to_vec())
    }
}

/// Resources stored as plain files under a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryResources {
    root: PathBuf,
}

impl DirectoryResources {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceProvider for DirectoryResources {
    fn lookup(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let relative = Path::new(name);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(ImageLoaderError::InvalidPath(format!(
                "Resource name escapes the resource root: {}",
                name
            )));
        }

        match std::fs::read(self.root.join(relative)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Resources compiled into the binary or registered at startup.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedResources {
    entries: HashMap<String, Cow<'static, [u8]>>,
}

impl EmbeddedResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, bytes: impl Into<Cow<'static, [u8]>>) -> Self {
        self.insert(name, bytes);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Cow<'static, [u8]>>) {
        let name = name.into();
        self.entries
            .insert(strip_leading_slashes(&name).to_string(), bytes.into());
    }
}

impl ResourceProvider for EmbeddedResources {
    fn lookup(&self, name: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(name).map(|bytes| bytes.to_vec()))
    }
}

pub struct SourceResolver {
    fetcher: Box<dyn Fetcher>,
    resources: Box<dyn ResourceProvider>,
}

impl SourceResolver {
    pub fn new(fetcher: impl Fetcher + 'static, resources: impl ResourceProvider + 'static) -> Self {
        Self {
            fetcher: Box::new(fetcher),
            resources: Box::new(resources),
        }
    }

    pub fn from_config(config: &LoaderConfig) -> Result<Self> {
        Ok(Self::new(
            HttpFetcher::new(config)?,
            DirectoryResources::new(config.resource_root.clone()),
        ))
    }

    pub fn resolve(&self, path: &str, is_absolute: bool) -> Result<Vec<u8>> {
        let source = Source::classify(path, is_absolute)?;
        self.fetch(&source)
    }

    pub fn fetch(&self, source: &Source) -> Result<Vec<u8>> {
        match source {
            Source::File(path) => {
                log::debug!("Reading file: {}", path.display());
                std::fs::read(path).map_err(|e| match e.kind() {
                    ErrorKind::NotFound => ImageLoaderError::NotFound(path.display().to_string()),
                    _ => ImageLoaderError::Io(e),
                })
            }
            Source::Remote(url) => self.fetcher.fetch(url),
            Source::DataUri { subtype, payload } => {
                log::debug!("Decoding inline {} payload ({} chars)", subtype, payload.len());
                PAYLOAD_ENGINE.decode(payload.trim()).map_err(|e| {
                    ImageLoaderError::InvalidPath(format!("Malformed base64 payload: {}", e))
                })
            }
            Source::Resource(name) => {
                log::debug!("Looking up resource: {}", name);
                self.resources
                    .lookup(name)?
                    .ok_or_else(|| ImageLoaderError::NotFound(name.clone()))
            }
        }
    }
}
