use axum::{extract::State, Json};
use shared::AppError;
use std::sync::Arc;

use crate::models::MessageStats;
use crate::state::AppState;

/// GET /stats - aggregate view over every stored message
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<MessageStats>, AppError> {
    let stats = state.store.stats().await?;
    Ok(Json(stats))
}
