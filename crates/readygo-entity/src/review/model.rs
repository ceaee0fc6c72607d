//! Review entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use readygo_core::types::{BookingId, ReviewId, UserId, VehicleId};

use crate::booking::Booking;

/// What a review row rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "review_aspect", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReviewAspect {
    /// The rented vehicle.
    Vehicle,
    /// The vehicle owner.
    Owner,
}

/// A single rating left by a customer after a completed booking.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    /// Unique review identifier.
    pub id: ReviewId,
    /// Booking the review belongs to.
    pub booking_id: BookingId,
    /// Vehicle of the booking.
    pub vehicle_id: VehicleId,
    /// Customer who wrote the review.
    pub reviewer_id: UserId,
    /// Owner being reviewed.
    pub reviewee_id: UserId,
    /// Rated aspect.
    pub aspect: ReviewAspect,
    /// Rating from 1 to 5.
    pub rating: i16,
    /// Optional comment.
    pub comment: Option<String>,
    /// When the review was written.
    pub created_at: DateTime<Utc>,
}

/// A validated feedback submission: one rating per aspect.
#[derive(Debug, Clone)]
pub struct Feedback {
    /// Rating of the vehicle.
    pub vehicle_rating: i16,
    /// Rating of the owner.
    pub owner_rating: i16,
    /// Shared comment, already trimmed; `None` when blank.
    pub comment: Option<String>,
}

impl Feedback {
    /// Expand the submission into the two review rows for `booking`.
    pub fn into_reviews(self, booking: &Booking) -> [Review; 2] {
        let now = Utc::now();
        let row = |aspect, rating| Review {
            id: ReviewId::new(),
            booking_id: booking.id,
            vehicle_id: booking.vehicle_id,
            reviewer_id: booking.customer_id,
            reviewee_id: booking.owner_id,
            aspect,
            rating,
            comment: self.comment.clone(),
            created_at: now,
        };
        [
            row(ReviewAspect::Vehicle, self.vehicle_rating),
            row(ReviewAspect::Owner, self.owner_rating),
        ]
    }
}
