//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let media_reachable = state.media.health_check().await.unwrap_or(false);
    Json(ApiResponse::ok(HealthResponse {
        status: if media_reachable { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        media_provider: state.media.provider_type().to_string(),
        media_reachable,
    }))
}
