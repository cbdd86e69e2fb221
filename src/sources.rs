//! Filesystem and HTTP dataset sources
//!
//! Both resolve the same relative resource paths
//! (`light-weight-data-set.json.gz`, `zipped-plants/{key}.gz`) against a
//! root: a directory for [`DirSource`], a base URL for [`HttpSource`].

#[cfg(feature = "api")]
use std::path::{Component, Path, PathBuf};

#[cfg(feature = "api")]
use crate::config::SourceLocation;
#[cfg(feature = "api")]
use crate::error::LoadError;
#[cfg(feature = "api")]
use crate::loader::{DatasetSource, MemorySource};

/// Reads resources from a local directory (e.g. the ETL `public/` output)
#[cfg(feature = "api")]
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

#[cfg(feature = "api")]
impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Keys are used verbatim, so a key containing `..` or a leading `/`
    /// could otherwise point outside the root.
    fn resolve(&self, resource: &str) -> Result<PathBuf, LoadError> {
        let relative = Path::new(resource);
        let contained = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if resource.is_empty() || !contained {
            return Err(LoadError::Transport {
                resource: resource.to_string(),
                reason: "resource path escapes the dataset directory".to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

#[cfg(feature = "api")]
impl DatasetSource for DirSource {
    async fn fetch(&self, resource: &str) -> Result<Vec<u8>, LoadError> {
        let path = self.resolve(resource)?;
        tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LoadError::Status { resource: resource.to_string(), status: 404 }
            } else {
                LoadError::Transport { resource: resource.to_string(), reason: e.to_string() }
            }
        })
    }
}

/// Fetches resources over HTTP(S) relative to a base URL
#[cfg(feature = "api")]
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    http: reqwest::Client,
}

#[cfg(feature = "api")]
impl HttpSource {
    pub fn new(base_url: &str) -> Result<Self, LoadError> {
        let http = reqwest::Client::builder().build().map_err(|e| LoadError::Transport {
            resource: base_url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Each path segment is percent-encoded on its own, so keys with spaces,
    /// quotes or `#` reach the server byte-for-byte. Empty, `.` and `..`
    /// segments are refused since URL resolution would collapse them.
    pub fn url_for(&self, resource: &str) -> Result<String, LoadError> {
        let mut path = Vec::new();
        for segment in resource.split('/') {
            if matches!(segment, "" | "." | "..") {
                return Err(LoadError::Transport {
                    resource: resource.to_string(),
                    reason: "resource path escapes the dataset root".to_string(),
                });
            }
            path.push(urlencoding::encode(segment).into_owned());
        }
        Ok(format!("{}/{}", self.base_url, path.join("/")))
    }
}

#[cfg(feature = "api")]
impl DatasetSource for HttpSource {
    async fn fetch(&self, resource: &str) -> Result<Vec<u8>, LoadError> {
        let url = self.url_for(resource)?;
        let transport = |e: reqwest::Error| LoadError::Transport {
            resource: resource.to_string(),
            reason: e.to_string(),
        };

        let response = self.http.get(&url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                resource: resource.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(transport)?;
        Ok(bytes.to_vec())
    }
}

/// Source selected by configuration
#[cfg(feature = "api")]
#[derive(Debug, Clone)]
pub enum AnySource {
    Dir(DirSource),
    Http(HttpSource),
    Memory(MemorySource),
}

#[cfg(feature = "api")]
impl AnySource {
    pub fn from_location(location: &SourceLocation) -> Result<Self, LoadError> {
        Ok(match location {
            SourceLocation::Dir(path) => AnySource::Dir(DirSource::new(path.clone())),
            SourceLocation::Http(url) => AnySource::Http(HttpSource::new(url)?),
        })
    }
}

#[cfg(feature = "api")]
impl DatasetSource for AnySource {
    async fn fetch(&self, resource: &str) -> Result<Vec<u8>, LoadError> {
        match self {
            AnySource::Dir(source) => source.fetch(resource).await,
            AnySource::Http(source) => source.fetch(resource).await,
            AnySource::Memory(source) => source.fetch(resource).await,
        }
    }
}
