//! HTTP facade over the extractor.
//!
//! Routes:
//! - `POST /extract` with `{"url": ...}`
//! - `POST /extract-batch` with `{"urls": [...]}`
//! - `GET /health`
//! - `GET /`

mod config;
mod handlers;

pub use config::ServerConfig;

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::scraper::Extract;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<dyn Extract>,
    /// Caller-side bound on a single `/extract` call.
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(extractor: Arc<dyn Extract>, config: &ServerConfig) -> Self {
        Self {
            extractor,
            request_timeout: config.request_timeout(),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .route("/extract", post(handlers::extract))
        .route("/extract-batch", post(handlers::extract_batch))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until Ctrl-C.
pub async fn serve(state: AppState, config: &ServerConfig) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
