//! Catalog: the immutable, query-ready bundle
//!
//! Built once from a loaded light dataset: owns the dataset, its search index
//! and the facet universes. Filtering and paging are pure functions of a
//! [`ViewState`].

use std::time::Instant;

use crate::error::CatalogError;
use crate::facets::FacetUniverse;
use crate::loader::{load_light_dataset, DatasetSource};
use crate::schema::LightDataset;
use crate::search_index::{SearchIndex, SearchMatch};
use crate::view::{Page, PlantRow, ViewState};

pub struct Catalog {
    dataset: LightDataset,
    index: SearchIndex,
    universe: FacetUniverse,
}

impl Catalog {
    /// Index the dataset and compute facet universes
    pub fn build(dataset: LightDataset) -> Result<Self, CatalogError> {
        let index = SearchIndex::build(&dataset)?;
        let universe = FacetUniverse::from_dataset(&dataset);

        tracing::info!(
            "Catalog ready: {} plants, {} types, {} zones, {} light values, {} maintenance values",
            dataset.len(),
            universe.types.len(),
            universe.zones.len(),
            universe.light.len(),
            universe.maintenance.len()
        );

        Ok(Self { dataset, index, universe })
    }

    /// Fetch the light dataset from `source` and build the catalog
    pub async fn load<S: DatasetSource>(source: &S) -> Result<Self, CatalogError> {
        let dataset = load_light_dataset(source).await?;
        Self::build(dataset)
    }

    pub fn dataset(&self) -> &LightDataset {
        &self.dataset
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    pub fn universe(&self) -> &FacetUniverse {
        &self.universe
    }

    pub fn initial_view(&self) -> ViewState {
        ViewState::initial(&self.universe)
    }

    pub fn search(&self, query: Option<&str>) -> SearchMatch {
        self.index.search(query)
    }

    /// Keys matching a text query in dataset order, or `None` when the
    /// query applies no text filter.
    pub fn search_keys(&self, query: Option<&str>) -> Option<Vec<&str>> {
        let hits = self.search(query);
        if hits.is_all() {
            return None;
        }
        Some(
            self.dataset
                .entries()
                .iter()
                .enumerate()
                .filter(|(pos, _)| hits.contains(*pos))
                .map(|(_, entry)| entry.key.as_str())
                .collect(),
        )
    }

    /// Dataset positions passing search AND every facet predicate, in
    /// insertion order
    pub fn filter(&self, view: &ViewState) -> Vec<usize> {
        let start = Instant::now();
        let hits = self.search(view.search_text());
        let selection = view.selection();

        let positions: Vec<usize> = self
            .dataset
            .entries()
            .iter()
            .enumerate()
            .filter(|(pos, entry)| hits.contains(*pos) && selection.matches(&entry.record))
            .map(|(pos, _)| pos)
            .collect();

        tracing::debug!(
            "Filter {:?} kept {} of {} plants in {:?}",
            view.search_text(),
            positions.len(),
            self.dataset.len(),
            start.elapsed()
        );
        positions
    }

    /// The visible page for `view`
    pub fn render(&self, view: &ViewState) -> Page {
        let filtered = self.filter(view);
        let window = view.window();
        let visible = window.visible(filtered.len());

        let rows = filtered[..visible]
            .iter()
            .filter_map(|&pos| self.dataset.entry(pos))
            .map(PlantRow::from_entry)
            .collect();

        Page {
            rows,
            total: filtered.len(),
            window,
            has_more: visible < filtered.len(),
        }
    }
}
