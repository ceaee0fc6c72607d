//! Administrator handlers.

use axum::Json;
use axum::extract::{Path, State};

use readygo_entity::booking::Booking;
use readygo_entity::dispute::DamageDispute;

use crate::dto::request::ReplyBody;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson, parse_id};
use crate::state::AppState;

/// GET /api/admin/bookings
pub async fn list_all_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Booking>>>, ApiError> {
    let bookings = state.booking_service.list_all(&auth).await?;
    Ok(Json(ApiResponse::ok(bookings)))
}

/// GET /api/admin/damage-reports
pub async fn list_all_disputes(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<DamageDispute>>>, ApiError> {
    let disputes = state.dispute_service.list_all(&auth).await?;
    Ok(Json(ApiResponse::ok(disputes)))
}

/// POST /api/admin/damage-reports/{id}/reply
pub async fn reply_dispute(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<ReplyBody>,
) -> Result<Json<ApiResponse<DamageDispute>>, ApiError> {
    let dispute = state
        .dispute_service
        .reply(&auth, parse_id(&id)?, &body.message)
        .await?;
    Ok(Json(ApiResponse::ok(dispute)))
}

/// PUT /api/admin/damage-reports/{id}/resolve
pub async fn resolve_dispute(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DamageDispute>>, ApiError> {
    let dispute = state
        .dispute_service
        .resolve(&auth, parse_id(&id)?)
        .await?;
    Ok(Json(ApiResponse::ok(dispute)))
}
