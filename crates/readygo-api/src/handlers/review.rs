//! Feedback and dispute lookup handlers shared by customers and owners.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use readygo_entity::dispute::DamageDispute;
use readygo_entity::review::Review;

use crate::dto::request::FeedbackBody;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson, parse_id};
use crate::state::AppState;

/// POST /api/reviews
pub async fn submit_feedback(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(body): ValidatedJson<FeedbackBody>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<Review>>>), ApiError> {
    let reviews = state
        .review_service
        .submit_feedback(&auth, body.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(reviews))))
}

/// GET /api/damage-reports/{id}
pub async fn get_dispute(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DamageDispute>>, ApiError> {
    let dispute = state.dispute_service.get(&auth, parse_id(&id)?).await?;
    Ok(Json(ApiResponse::ok(dispute)))
}
