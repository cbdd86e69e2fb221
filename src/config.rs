//! Environment-driven configuration
//!
//! Variables:
//! - `CATALOG_SOURCE`: dataset directory, or an http(s) base URL (default `public`)
//! - `PORT`: HTTP port for the catalog server (default 3000)
//! - `DETAIL_CACHE_CAPACITY`: max cached detail views (default 1000)
//! - `DETAIL_CACHE_TTL_SECS`: detail cache time-to-live (default 300)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Where the light dataset and detail records are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Dir(PathBuf),
    Http(String),
}

impl SourceLocation {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            SourceLocation::Http(raw.to_string())
        } else {
            SourceLocation::Dir(PathBuf::from(raw))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub source: SourceLocation,
    pub port: u16,
    pub detail_cache_capacity: u64,
    pub detail_cache_ttl: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: SourceLocation::Dir(PathBuf::from("public")),
            port: 3000,
            detail_cache_capacity: 1_000,
            detail_cache_ttl: Duration::from_secs(300),
        }
    }
}

impl CatalogConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let source = get("CATALOG_SOURCE")
            .map(|raw| SourceLocation::parse(&raw))
            .unwrap_or(defaults.source);
        let port = parse_var("PORT", get("PORT"))?.unwrap_or(defaults.port);
        let detail_cache_capacity = parse_var("DETAIL_CACHE_CAPACITY", get("DETAIL_CACHE_CAPACITY"))?
            .unwrap_or(defaults.detail_cache_capacity);
        let detail_cache_ttl = parse_var::<u64>("DETAIL_CACHE_TTL_SECS", get("DETAIL_CACHE_TTL_SECS"))?
            .map(Duration::from_secs)
            .unwrap_or(defaults.detail_cache_ttl);

        Ok(Self {
            source,
            port,
            detail_cache_capacity,
            detail_cache_ttl,
        })
    }
}

fn parse_var<T>(name: &'static str, raw: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.map(|value| {
        value.trim().parse::<T>().map_err(|e| ConfigError {
            name,
            reason: e.to_string(),
            value,
        })
    })
    .transpose()
}
