// Catalog API Server Module
//
// Purpose: JSON API over the in-memory plant catalog (facets, filtered pages)
// plus on-demand detail records fetched through the configured dataset source.

#[cfg(feature = "api")]
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};

#[cfg(feature = "api")]
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};

#[cfg(feature = "api")]
use moka::future::Cache;

#[cfg(feature = "api")]
use serde::Deserialize;

#[cfg(feature = "api")]
use std::sync::Arc;

#[cfg(feature = "api")]
use std::time::Instant;

#[cfg(feature = "api")]
use crate::catalog::Catalog;

#[cfg(feature = "api")]
use crate::config::CatalogConfig;

#[cfg(feature = "api")]
use crate::detail::DetailView;

#[cfg(feature = "api")]
use crate::error::LoadError;

#[cfg(feature = "api")]
use crate::facets::{Facet, FacetSelection, FacetUniverse};

#[cfg(feature = "api")]
use crate::loader::load_detail_record;

#[cfg(feature = "api")]
use crate::sources::AnySource;

#[cfg(feature = "api")]
use crate::view::{Page, ViewState};

// ============================================================================
// Application State
// ============================================================================

#[cfg(feature = "api")]
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub source: Arc<AnySource>,
    /// Projected detail views keyed by plant key
    pub detail_cache: Cache<String, DetailView>,
}

#[cfg(feature = "api")]
impl AppState {
    pub async fn new(config: &CatalogConfig) -> anyhow::Result<Self> {
        tracing::info!("Opening dataset source {:?}...", config.source);
        let source = AnySource::from_location(&config.source)?;

        tracing::info!("Loading light dataset and building catalog...");
        let catalog = Catalog::load(&source).await?;

        Ok(Self::from_parts(catalog, source, config))
    }

    /// Assemble state from an already-built catalog
    pub fn from_parts(catalog: Catalog, source: AnySource, config: &CatalogConfig) -> Self {
        tracing::info!("Initializing Moka detail cache...");
        let detail_cache = Cache::builder()
            .max_capacity(config.detail_cache_capacity)
            .time_to_live(config.detail_cache_ttl)
            .build();

        Self {
            catalog: Arc::new(catalog),
            source: Arc::new(source),
            detail_cache,
        }
    }
}

// ============================================================================
// Router
// ============================================================================

#[cfg(feature = "api")]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Catalog endpoints
        .route("/api/facets", get(get_facets))
        .route("/api/view", post(render_view))

        // Detail endpoint (fetched through the dataset source, cached)
        .route("/api/plants/:key", get(get_plant_detail))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Request Types
// ============================================================================

/// Body of `POST /api/view`. An absent facet list selects every value of
/// that facet; an empty list selects none.
#[cfg(feature = "api")]
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ViewRequest {
    pub search: Option<String>,
    pub types: Option<Vec<String>>,
    pub zones: Option<Vec<String>>,
    pub light: Option<Vec<String>>,
    pub maintenance: Option<Vec<String>>,
    pub include_problem_plants: Option<bool>,
    pub window: Option<usize>,
}

#[cfg(feature = "api")]
impl ViewRequest {
    pub fn to_view(&self, universe: &FacetUniverse) -> ViewState {
        let facets = [
            (Facet::Type, &self.types),
            (Facet::Zone, &self.zones),
            (Facet::Light, &self.light),
            (Facet::Maintenance, &self.maintenance),
        ];

        let mut selection = FacetSelection::all(universe);
        for (facet, values) in facets {
            if let Some(values) = values {
                selection = selection.with_values(facet, values.iter().cloned());
            }
        }
        if let Some(include) = self.include_problem_plants {
            selection = selection.with_problem_plants(include);
        }

        let view = ViewState::new(self.search.clone(), selection);
        match self.window {
            Some(size) => view.with_window(size),
            None => view,
        }
    }
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

#[cfg(feature = "api")]
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "plants": state.catalog.dataset().len(),
    }))
}

#[cfg(feature = "api")]
async fn get_facets(State(state): State<AppState>) -> Json<FacetUniverse> {
    Json(state.catalog.universe().clone())
}

#[cfg(feature = "api")]
async fn render_view(
    State(state): State<AppState>,
    Json(request): Json<ViewRequest>,
) -> Json<Page> {
    let start = Instant::now();
    let view = request.to_view(state.catalog.universe());
    let page = state.catalog.render(&view);

    tracing::debug!(
        "View {:?}: {} of {} rows in {:?}",
        view.search_text(),
        page.rows.len(),
        page.total,
        start.elapsed()
    );
    Json(page)
}

#[cfg(feature = "api")]
async fn get_plant_detail(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DetailView>, AppError> {
    // Check cache
    if let Some(cached) = state.detail_cache.get(&key).await {
        tracing::debug!("Cache hit for plant {}", key);
        return Ok(Json(cached));
    }

    tracing::debug!("Fetching detail record for {}", key);
    let record = load_detail_record(state.source.as_ref(), &key).await?;
    let view = DetailView::project(&record);

    state.detail_cache.insert(key, view.clone()).await;

    Ok(Json(view))
}

// ============================================================================
// Error Handling
// ============================================================================

#[cfg(feature = "api")]
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Upstream(String),
}

#[cfg(feature = "api")]
impl From<LoadError> for AppError {
    fn from(err: LoadError) -> Self {
        if err.is_not_found() {
            AppError::NotFound(format!("{} not found", err.resource()))
        } else {
            tracing::warn!("Detail load failed: {}", err);
            AppError::Upstream(err.to_string())
        }
    }
}

#[cfg(feature = "api")]
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
