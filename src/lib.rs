use axum::{extract::DefaultBodyLimit, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod models;
pub mod monitoring;
pub mod observability;
pub mod state;
pub mod webhook;

use api::create_api_router;
use monitoring::monitoring_router;
use observability::{metrics_middleware, request_id_middleware};
use state::AppState;
use webhook::create_webhook_router;

use axum::middleware as axum_middleware;

pub fn create_app_router(app_state: Arc<AppState>) -> Router {
    let max_body_bytes = app_state.max_body_bytes;

    Router::new()
        // Signed ingestion
        .merge(create_webhook_router())
        // Query + aggregate endpoints
        .merge(create_api_router())
        // Probes and Prometheus /metrics
        .merge(monitoring_router())
        .with_state(app_state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(axum_middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        // Outermost so every inner layer and handler sees the request id
        .layer(axum_middleware::from_fn(request_id_middleware))
}
