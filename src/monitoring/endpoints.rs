use axum::{extract::State, routing::get, Json, Router};
use shared::AppError;
use std::sync::Arc;
use tracing::warn;

use crate::models::StatusResponse;
use crate::observability::metrics_handler;
use crate::state::AppState;

/// Create monitoring router with probes and the metrics endpoint
pub fn monitoring_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health/live", get(liveness_check))
        .route("/health/ready", get(readiness_check))
        .route("/metrics", get(metrics_handler))
}

/// Process-local liveness; never touches the store.
async fn liveness_check() -> Json<StatusResponse> {
    Json(StatusResponse::ok())
}

/// Ready only while the store answers a trivial probe query.
async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, AppError> {
    match state.store.ping().await {
        Ok(()) => Ok(Json(StatusResponse::ok())),
        Err(e) => {
            warn!(error = %e, "Readiness probe failed");
            Err(AppError::service_unavailable("not ready"))
        }
    }
}
