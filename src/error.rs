//! Error taxonomy for dataset loading and catalog construction
//!
//! A failed gzip decode is not represented here: it is recovered by the
//! plain-text fallback in `decode` and only shows up as `Encoding::Plain`.

use thiserror::Error;

/// Failure fetching or parsing one of the catalog resources.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Network or I/O failure before any response arrived.
    #[error("failed to fetch {resource}: {reason}")]
    Transport { resource: String, reason: String },

    /// The source answered, but not with a success status.
    #[error("fetching {resource} returned status {status}")]
    Status { resource: String, status: u16 },

    /// The payload decoded to text that is not valid JSON of the expected shape.
    #[error("malformed payload in {resource}: {source}")]
    Parse {
        resource: String,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    pub fn resource(&self) -> &str {
        match self {
            LoadError::Transport { resource, .. }
            | LoadError::Status { resource, .. }
            | LoadError::Parse { resource, .. } => resource,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::Status { status: 404, .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, LoadError::Parse { .. })
    }
}

/// Failure producing a ready-to-query catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("failed to build search index: {0}")]
    Index(#[from] fst::Error),
}

/// Invalid value in the process environment.
#[derive(Debug, Error)]
#[error("invalid value {value:?} for {name}: {reason}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
    pub reason: String,
}
