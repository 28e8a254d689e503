//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::kernel::EnrichmentJob;
use crate::server::routes::{full_process_handler, health_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub job: Arc<EnrichmentJob>,
}

/// Build the Axum application router
pub fn build_app(job: Arc<EnrichmentJob>) -> Router {
    let state = AppState { job };

    Router::new()
        .route("/full_process", post(full_process_handler))
        .route("/health", get(health_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
}
