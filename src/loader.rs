//! Dataset Loader
//!
//! Fetches the light dataset and per-plant detail records through a
//! [`DatasetSource`], runs them through the two-stage decoder and parses the
//! resulting JSON. Filesystem and HTTP sources live in `sources` (behind the
//! `api` feature); [`MemorySource`] is always available.

use std::future::Future;
use std::time::Instant;

use rustc_hash::FxHashMap;
use serde_json::{Map, Value};

use crate::decode::{decode_payload, Encoding};
use crate::error::LoadError;
use crate::schema::LightDataset;

/// Well-known resource holding the light dataset
pub const LIGHT_DATASET_RESOURCE: &str = "light-weight-data-set.json.gz";

/// Directory holding one `{key}.gz` per plant
pub const DETAIL_DIR: &str = "zipped-plants";

/// Full detail record: arbitrary kebab-case keys, not strongly typed
pub type FullRecord = Map<String, Value>;

/// Resource path of a plant's detail record. The key is used verbatim.
pub fn detail_resource(key: &str) -> String {
    format!("{}/{}.gz", DETAIL_DIR, key)
}

/// Transport seam: resolve a resource path to its raw bytes
pub trait DatasetSource {
    fn fetch(&self, resource: &str) -> impl Future<Output = Result<Vec<u8>, LoadError>> + Send;
}

/// Load and parse the light dataset
pub async fn load_light_dataset<S: DatasetSource>(source: &S) -> Result<LightDataset, LoadError> {
    let start = Instant::now();
    let bytes = source.fetch(LIGHT_DATASET_RESOURCE).await?;
    let dataset = parse_light_dataset(LIGHT_DATASET_RESOURCE, &bytes)?;

    tracing::info!(
        "Loaded light dataset in {:?} ({} plants, {} bytes)",
        start.elapsed(),
        dataset.len(),
        bytes.len()
    );
    Ok(dataset)
}

/// Load and parse one detail record by its exact light-dataset key
pub async fn load_detail_record<S: DatasetSource>(source: &S, key: &str) -> Result<FullRecord, LoadError> {
    let resource = detail_resource(key);
    tracing::debug!("Fetching detail record {}", resource);
    let bytes = source.fetch(&resource).await?;
    parse_detail_record(&resource, &bytes)
}

pub fn parse_light_dataset(resource: &str, bytes: &[u8]) -> Result<LightDataset, LoadError> {
    let text = decoded_text(resource, bytes);
    LightDataset::from_json(&text).map_err(|source| LoadError::Parse {
        resource: resource.to_string(),
        source,
    })
}

pub fn parse_detail_record(resource: &str, bytes: &[u8]) -> Result<FullRecord, LoadError> {
    let text = decoded_text(resource, bytes);
    serde_json::from_str(&text).map_err(|source| LoadError::Parse {
        resource: resource.to_string(),
        source,
    })
}

fn decoded_text(resource: &str, bytes: &[u8]) -> String {
    let decoded = decode_payload(bytes);
    if decoded.encoding == Encoding::Plain {
        tracing::debug!("{} is not gzip-compressed, reading as plain text", resource);
    }
    decoded.text
}

/// In-memory source keyed by resource path
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    resources: FxHashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, resource: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.resources.insert(resource.into(), bytes.into());
    }

    pub fn with(mut self, resource: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(resource, bytes);
        self
    }
}

impl DatasetSource for MemorySource {
    async fn fetch(&self, resource: &str) -> Result<Vec<u8>, LoadError> {
        self.resources
            .get(resource)
            .cloned()
            .ok_or_else(|| LoadError::Status {
                resource: resource.to_string(),
                status: 404,
            })
    }
}
