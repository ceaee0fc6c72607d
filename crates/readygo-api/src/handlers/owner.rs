//! Owner handlers: actioning requests, damage reports, dashboard.

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;

use readygo_core::types::BookingId;
use readygo_entity::booking::Booking;
use readygo_entity::dispute::DamageDispute;
use readygo_entity::review::Review;
use readygo_service::booking::OwnerStats;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, EvidenceForm, parse_id};
use crate::state::AppState;

/// GET /api/owner/bookings
pub async fn list_owner_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Booking>>>, ApiError> {
    let bookings = state.booking_service.list_for_owner(&auth).await?;
    Ok(Json(ApiResponse::ok(bookings)))
}

/// GET /api/owner/stats
pub async fn owner_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<OwnerStats>>, ApiError> {
    let stats = state.stats_service.owner_stats(&auth).await?;
    Ok(Json(ApiResponse::ok(stats)))
}

/// POST /api/owner/bookings/{id}/confirm-with-video
pub async fn confirm_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<Booking>>, ApiError> {
    let booking_id: BookingId = parse_id(&id)?;
    let form = EvidenceForm::read(multipart, "video").await?;
    let booking = state
        .booking_service
        .confirm_booking(&auth, booking_id, form.video)
        .await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// PUT /api/owner/bookings/{id}/reject
pub async fn reject_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Booking>>, ApiError> {
    let booking = state
        .booking_service
        .reject_booking(&auth, parse_id(&id)?)
        .await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// PUT /api/owner/bookings/{id}/complete
pub async fn complete_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Booking>>, ApiError> {
    let booking = state
        .booking_service
        .complete_booking(&auth, parse_id(&id)?)
        .await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// POST /api/owner/bookings/{id}/report-damage
pub async fn report_damage(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<DamageDispute>>), ApiError> {
    let booking_id: BookingId = parse_id(&id)?;
    let form = EvidenceForm::read(multipart, "damageVideo").await?;
    let dispute = state
        .dispute_service
        .report_damage(
            &auth,
            booking_id,
            form.description.as_deref().unwrap_or(""),
            form.video,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(dispute))))
}

/// GET /api/owner/damage-reports
pub async fn list_owner_disputes(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<DamageDispute>>>, ApiError> {
    let disputes = state.dispute_service.list_for_owner(&auth).await?;
    Ok(Json(ApiResponse::ok(disputes)))
}

/// GET /api/owner/ratings
pub async fn owner_ratings(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Review>>>, ApiError> {
    let reviews = state.review_service.owner_ratings(&auth).await?;
    Ok(Json(ApiResponse::ok(reviews)))
}
