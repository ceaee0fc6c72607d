//! Request DTOs with validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use readygo_core::types::{BookingId, UserId, VehicleId};
use readygo_service::booking::CreateBookingRequest;
use readygo_service::review::FeedbackRequest;

/// Booking request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingBody {
    /// Vehicle to rent.
    pub vehicle_id: VehicleId,
    /// Listing owner.
    pub owner_id: UserId,
    /// First rental day (`YYYY-MM-DD`).
    pub start_date: NaiveDate,
    /// Last rental day.
    pub end_date: NaiveDate,
    /// Price the client computed. Logged, never trusted.
    pub total_price: Option<i64>,
}

impl From<CreateBookingBody> for CreateBookingRequest {
    fn from(body: CreateBookingBody) -> Self {
        Self {
            vehicle_id: body.vehicle_id,
            owner_id: body.owner_id,
            start_date: body.start_date,
            end_date: body.end_date,
            client_price: body.total_price,
        }
    }
}

/// Feedback body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackBody {
    /// Completed booking being reviewed.
    pub booking_id: BookingId,
    /// 1 to 5.
    #[validate(range(min = 1, max = 5, message = "Vehicle rating must be between 1 and 5"))]
    pub vehicle_rating: i64,
    /// 1 to 5.
    #[validate(range(min = 1, max = 5, message = "Owner rating must be between 1 and 5"))]
    pub owner_rating: i64,
    /// Free text.
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

impl From<FeedbackBody> for FeedbackRequest {
    fn from(body: FeedbackBody) -> Self {
        Self {
            booking_id: body.booking_id,
            vehicle_rating: body.vehicle_rating,
            owner_rating: body.owner_rating,
            comment: body.comment,
        }
    }
}

/// Administrator reply on a dispute.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ReplyBody {
    /// Message shown to both parties.
    #[validate(length(min = 1, max = 4000, message = "Reply message is required"))]
    pub message: String,
}
