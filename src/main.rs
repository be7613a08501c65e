use std::sync::Arc;

use anyhow::Context;
use axum::{http::Method, routing::get};
use axum_prometheus::PrometheusMetricLayer;
use catalog::HttpCatalog;
use config::Config;
use notifications::TracingNotifier;
use routes::cart_router;
use state::AppState;
use storage::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore};
use store::CartStore;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{event, Level};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use dotenv::dotenv;

mod catalog;
mod config;
mod domain;
mod dtos;
mod errors;
mod notifications;
mod routes;
mod state;
mod storage;
mod store;
#[cfg(test)]
mod test_support;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    let writer = match &config.log_path {
        Some(path) => BoxMakeWriter::new(std::fs::File::create(path).with_context(|| format!("cannot create log file {}", path.display()))?),
        None => BoxMakeWriter::new(std::io::stdout),
    };

    tracing_subscriber::
    fmt()
    .with_max_level(config.log_level)
    .with_target(false)
    .with_ansi(false)
    .json()
    .with_file(true)
    .with_line_number(true)
    .with_current_span(true)
    .with_writer(writer)
    .init();

    let storage: Arc<dyn KeyValueStore + Send + Sync> = match &config.storage_path {
        Some(path) => Arc::new(FileKeyValueStore::new(path)),
        None => {
            event!(Level::WARN, "CART_STORAGE_PATH not set, cart will not outlive the process");
            Arc::new(InMemoryKeyValueStore::new())
        }
    };

    let catalog = Arc::new(HttpCatalog::new(&config.catalog_api_url)?);
    let cart_store = Arc::new(CartStore::new(catalog, storage, Arc::new(TracingNotifier))?);

    let state = Arc::new(AppState {
        cart_store: cart_store,
    });

    let (prometheus_layer, metrics_handle) = PrometheusMetricLayer::pair();

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    event!(Level::INFO, port = config.port, catalog = %config.catalog_api_url, "cart service listening");

    axum::serve(listener, cart_router(state)
        .route("/metrics", get(|| async move {metrics_handle.render()}))

        .layer(prometheus_layer)
        .layer(
            ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::very_permissive().allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE]))
        )).await?;

    Ok(())
}
