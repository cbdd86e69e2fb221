// Catalog API Server Binary Entry Point
//
// Purpose: Load the light dataset, build the catalog and serve it over Axum
// Usage: cargo run --features api --bin catalog_server

use plant_catalog::{create_router, AppState, CatalogConfig};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "plant_catalog=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting catalog server...");

    // Configuration from environment variables
    let config = CatalogConfig::from_env()?;

    tracing::info!("Configuration:");
    tracing::info!("  CATALOG_SOURCE: {:?}", config.source);
    tracing::info!("  PORT: {}", config.port);
    tracing::info!("  DETAIL_CACHE_CAPACITY: {}", config.detail_cache_capacity);
    tracing::info!("  DETAIL_CACHE_TTL_SECS: {}", config.detail_cache_ttl.as_secs());

    // Initialize application state (loads dataset, builds index)
    let state = AppState::new(&config).await?;
    tracing::info!("Application state initialized successfully");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
