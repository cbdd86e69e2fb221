//! Plant Catalog
//!
//! Searchable, faceted catalog over a static plant dataset.
//!
//! - `schema`/`decode`/`loader`: light dataset and detail record loading
//!   (gzip or plain JSON) through a [`DatasetSource`]
//! - `search_index`: FST prefix index over each plant's searchable text
//! - `facets`/`view`: facet universes, selections, immutable view state and
//!   the render window
//! - `catalog`: the query-ready bundle; filtering and paging
//! - `detail`: allow-listed projection of full detail records
//! - `session`: single-threaded event model (loading, actions, detail pane)
//! - `api_server` (feature `api`): Axum JSON API over the catalog

pub mod catalog;
pub mod config;
pub mod decode;
pub mod detail;
pub mod error;
pub mod facets;
pub mod loader;
pub mod schema;
pub mod search_index;
pub mod session;
pub mod sources;
pub mod view;

pub mod api_server;

// Re-export commonly used types
pub use catalog::Catalog;
pub use config::{CatalogConfig, SourceLocation};
pub use detail::DetailView;
pub use error::{CatalogError, ConfigError, LoadError};
pub use facets::{Facet, FacetSelection, FacetUniverse};
pub use loader::{DatasetSource, FullRecord, MemorySource};
pub use schema::{LightDataset, LightRecord, PlantEntry};
pub use search_index::{SearchIndex, SearchMatch};
pub use session::{Action, Session};
pub use view::{Page, PlantRow, ViewState};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState, ViewRequest};

#[cfg(feature = "api")]
pub use sources::{AnySource, DirSource, HttpSource};
