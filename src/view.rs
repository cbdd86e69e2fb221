//! View State, Ordering & Pagination
//!
//! A [`ViewState`] is an immutable snapshot of everything the user controls:
//! search text, facet selection and the render window. Every action returns
//! a fresh state, and the visible page is a pure function of
//! (catalog, view state).
//!
//! Results keep the dataset's insertion order. The render window bounds how
//! many filtered rows are materialized; any search or facet change resets it
//! to [`DEFAULT_WINDOW`], and "load more" grows it by [`WINDOW_INCREMENT`].

use serde::Serialize;

use crate::facets::{compare_zones, Facet, FacetSelection, FacetUniverse};
use crate::schema::PlantEntry;

pub const DEFAULT_WINDOW: usize = 200;
pub const WINDOW_INCREMENT: usize = 200;

/// How many filtered rows are realized into view
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RenderWindow(usize);

impl Default for RenderWindow {
    fn default() -> Self {
        RenderWindow(DEFAULT_WINDOW)
    }
}

impl RenderWindow {
    /// A window of at least the default size
    pub fn at_least_default(size: usize) -> Self {
        RenderWindow(size.max(DEFAULT_WINDOW))
    }

    pub fn get(self) -> usize {
        self.0
    }

    pub fn grown(self) -> Self {
        RenderWindow(self.0.saturating_add(WINDOW_INCREMENT))
    }

    /// Rows visible out of `count` filtered results
    pub fn visible(self, count: usize) -> usize {
        self.0.min(count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    search: Option<String>,
    selection: FacetSelection,
    window: RenderWindow,
}

impl ViewState {
    /// No search text, every facet value selected, problem plants included
    pub fn initial(universe: &FacetUniverse) -> Self {
        Self::new(None, FacetSelection::all(universe))
    }

    pub fn new(search: Option<String>, selection: FacetSelection) -> Self {
        Self {
            search,
            selection,
            window: RenderWindow::default(),
        }
    }

    pub fn search_text(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn selection(&self) -> &FacetSelection {
        &self.selection
    }

    pub fn window(&self) -> RenderWindow {
        self.window
    }

    pub fn with_search(&self, text: impl Into<String>) -> Self {
        Self::new(Some(text.into()), self.selection.clone())
    }

    pub fn without_search(&self) -> Self {
        Self::new(None, self.selection.clone())
    }

    pub fn with_selection(&self, selection: FacetSelection) -> Self {
        Self::new(self.search.clone(), selection)
    }

    pub fn toggled(&self, facet: Facet, value: &str) -> Self {
        self.with_selection(self.selection.toggled(facet, value))
    }

    pub fn with_all(&self, facet: Facet, universe: &FacetUniverse) -> Self {
        self.with_selection(self.selection.with_all(facet, universe))
    }

    pub fn cleared(&self, facet: Facet) -> Self {
        self.with_selection(self.selection.cleared(facet))
    }

    pub fn with_problem_plants(&self, include: bool) -> Self {
        self.with_selection(self.selection.with_problem_plants(include))
    }

    /// Grow the window; filters are untouched
    pub fn load_more(&self) -> Self {
        Self {
            window: self.window.grown(),
            ..self.clone()
        }
    }

    /// Restore a window (e.g. from a request), never below the default
    pub fn with_window(&self, size: usize) -> Self {
        Self {
            window: RenderWindow::at_least_default(size),
            ..self.clone()
        }
    }
}

/// One row of the result list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlantRow {
    pub key: String,
    pub title: String,
    pub common_names: Vec<String>,
    pub plant_types: Vec<String>,
    pub zone_range: Option<String>,
    pub light: Vec<String>,
    pub maintenance: Vec<String>,
}

impl PlantRow {
    pub fn from_entry(entry: &PlantEntry) -> Self {
        let record = &entry.record;
        Self {
            key: entry.key.clone(),
            title: record.full_name.clone().unwrap_or_else(|| entry.key.clone()),
            common_names: record.common_names.clone(),
            plant_types: record.plant_types.clone(),
            zone_range: zone_range(&record.hardiness_zones),
            light: record.light.clone(),
            maintenance: record.maintenance.clone(),
        }
    }
}

/// "lo - hi" over the zone order, or the single zone
pub fn zone_range(zones: &[String]) -> Option<String> {
    let lo = zones.iter().min_by(|a, b| compare_zones(a, b))?;
    let hi = zones.iter().max_by(|a, b| compare_zones(a, b))?;
    if lo == hi {
        Some(lo.clone())
    } else {
        Some(format!("{} - {}", lo, hi))
    }
}

/// The visible slice of a filtered result set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    pub rows: Vec<PlantRow>,
    pub total: usize,
    pub window: RenderWindow,
    pub has_more: bool,
}
