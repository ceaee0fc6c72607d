//! Customer booking handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use readygo_entity::booking::Booking;
use readygo_service::booking::CustomerStats;

use crate::dto::request::CreateBookingBody;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<CreateBookingBody>,
) -> Result<(StatusCode, Json<ApiResponse<Booking>>), ApiError> {
    let booking = state
        .booking_service
        .create_booking(&auth, body.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(booking))))
}

/// GET /api/bookings/customer
pub async fn list_customer_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<Booking>>>, ApiError> {
    let bookings = state.booking_service.list_for_customer(&auth).await?;
    Ok(Json(ApiResponse::ok(bookings)))
}

/// GET /api/bookings/stats
pub async fn customer_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<CustomerStats>>, ApiError> {
    let stats = state.stats_service.customer_stats(&auth).await?;
    Ok(Json(ApiResponse::ok(stats)))
}
