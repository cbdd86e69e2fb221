//! Session: the single-threaded event model
//!
//! One session loads the light dataset once. Until the catalog is ready every
//! search or facet action is rejected; a failed load leaves the session in a
//! persistent error state. Detail requests may overlap: whichever response is
//! handed to [`Session::receive_detail`] last is what the pane shows. A failed
//! detail fetch raises a transient notice and keeps the previous pane; the
//! next successful fetch clears it.

use crate::catalog::Catalog;
use crate::detail::DetailView;
use crate::error::{CatalogError, LoadError};
use crate::facets::Facet;
use crate::loader::{load_detail_record, load_light_dataset, DatasetSource, FullRecord};
use crate::schema::LightDataset;
use crate::view::{Page, ViewState};

pub enum Phase {
    Loading,
    Ready { catalog: Catalog, view: ViewState },
    Failed { message: String },
}

/// A user input that produces a new view state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Search(String),
    ClearSearch,
    Toggle(Facet, String),
    SelectAll(Facet),
    ClearAll(Facet),
    IncludeProblemPlants(bool),
    LoadMore,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetailPane {
    #[default]
    Empty,
    Showing { key: String, view: DetailView },
}

pub struct Session {
    phase: Phase,
    detail: DetailPane,
    notice: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: Phase::Loading,
            detail: DetailPane::Empty,
            notice: None,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading)
    }

    /// Message of a failed dataset load
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed { message } => Some(message),
            _ => None,
        }
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        match &self.phase {
            Phase::Ready { catalog, .. } => Some(catalog),
            _ => None,
        }
    }

    pub fn view(&self) -> Option<&ViewState> {
        match &self.phase {
            Phase::Ready { view, .. } => Some(view),
            _ => None,
        }
    }

    pub fn page(&self) -> Option<Page> {
        match &self.phase {
            Phase::Ready { catalog, view } => Some(catalog.render(view)),
            _ => None,
        }
    }

    /// Fetch the light dataset and move out of the loading phase
    pub async fn load<S: DatasetSource>(&mut self, source: &S) {
        let result = load_light_dataset(source).await;
        self.finish_loading(result);
    }

    /// Only the first completion is applied; a session never reloads.
    pub fn finish_loading(&mut self, result: Result<LightDataset, LoadError>) {
        if !self.is_loading() {
            tracing::warn!("Ignoring dataset load result: session already initialized");
            return;
        }

        self.phase = match result.map_err(CatalogError::from).and_then(Catalog::build) {
            Ok(catalog) => {
                let view = catalog.initial_view();
                Phase::Ready { catalog, view }
            }
            Err(e) => {
                tracing::warn!("Catalog failed to load: {}", e);
                Phase::Failed { message: e.to_string() }
            }
        };
    }

    /// Apply a user action. Returns false (and changes nothing) unless the
    /// catalog is ready.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let Phase::Ready { catalog, view } = &mut self.phase else {
            tracing::debug!("Rejected {:?}: catalog not ready", action);
            return false;
        };

        let next = match action {
            Action::Search(text) => view.with_search(text),
            Action::ClearSearch => view.without_search(),
            Action::Toggle(facet, value) => view.toggled(facet, &value),
            Action::SelectAll(facet) => view.with_all(facet, catalog.universe()),
            Action::ClearAll(facet) => view.cleared(facet),
            Action::IncludeProblemPlants(include) => view.with_problem_plants(include),
            Action::LoadMore => view.load_more(),
        };
        *view = next;
        true
    }

    /// Fetch one plant's detail record and hand the result to the pane
    pub async fn open_detail<S: DatasetSource>(&mut self, source: &S, key: &str) {
        let result = load_detail_record(source, key).await;
        self.receive_detail(key, result);
    }

    /// Responses arriving before the catalog is ready are dropped.
    pub fn receive_detail(&mut self, key: &str, result: Result<FullRecord, LoadError>) {
        if !matches!(self.phase, Phase::Ready { .. }) {
            tracing::debug!("Dropping detail response for {}: catalog not ready", key);
            return;
        }

        match result {
            Ok(record) => {
                self.detail = DetailPane::Showing {
                    key: key.to_string(),
                    view: DetailView::project(&record),
                };
                self.notice = None;
            }
            Err(e) => {
                tracing::warn!("Detail load for {} failed: {}", key, e);
                self.notice = Some(format!("Could not load details for {}: {}", key, e));
            }
        }
    }

    pub fn detail(&self) -> &DetailPane {
        &self.detail
    }

    pub fn close_detail(&mut self) {
        self.detail = DetailPane::Empty;
    }

    /// Pending transient notice, cleared once taken
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }
}
