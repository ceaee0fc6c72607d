//! Review idempotency guard.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use readygo_core::error::AppError;
use readygo_core::result::AppResult;
use readygo_core::types::BookingId;
use readygo_database::store::{BookingStore, FeedbackOutcome, ReviewStore, Stores};
use readygo_entity::booking::BookingStatus;
use readygo_entity::review::{Feedback, Review};
use readygo_entity::user::UserRole;

use crate::context::RequestContext;

/// A customer's ratings for one completed booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRequest {
    /// Booking being reviewed.
    pub booking_id: BookingId,
    /// Vehicle rating, 1 to 5.
    pub vehicle_rating: i64,
    /// Owner rating, 1 to 5.
    pub owner_rating: i64,
    /// Optional comment applied to both rows.
    #[serde(default)]
    pub comment: Option<String>,
}

fn rating(value: i64, what: &str) -> AppResult<i16> {
    match i16::try_from(value) {
        Ok(r @ 1..=5) => Ok(r),
        _ => Err(AppError::validation(format!(
            "{what} rating must be between 1 and 5"
        ))),
    }
}

fn already_reviewed() -> AppError {
    AppError::conflict("Feedback has already been submitted for this booking")
}

/// Records exactly one feedback submission per completed booking.
#[derive(Debug, Clone)]
pub struct ReviewService {
    bookings: Arc<dyn BookingStore>,
    reviews: Arc<dyn ReviewStore>,
}

impl ReviewService {
    /// Creates a new review service.
    pub fn new(stores: &Stores) -> Self {
        Self {
            bookings: stores.bookings.clone(),
            reviews: stores.reviews.clone(),
        }
    }

    /// Stores the vehicle and owner reviews for a completed booking.
    pub async fn submit_feedback(
        &self,
        ctx: &RequestContext,
        req: FeedbackRequest,
    ) -> AppResult<Vec<Review>> {
        ctx.require(UserRole::Customer)?;
        let feedback = Feedback {
            vehicle_rating: rating(req.vehicle_rating, "Vehicle")?,
            owner_rating: rating(req.owner_rating, "Owner")?,
            comment: req
                .comment
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        };

        let booking = self
            .bookings
            .find_booking(req.booking_id)
            .await?
            .ok_or_else(|| AppError::not_found("Booking not found"))?;

        if booking.customer_id != ctx.user_id {
            return Err(AppError::authorization(
                "You can only review your own bookings",
            ));
        }
        if booking.status != BookingStatus::Completed {
            return Err(AppError::conflict(
                "Feedback can only be left for completed bookings",
            ));
        }
        if booking.feedback_given || self.reviews.has_review(booking.id, ctx.user_id).await? {
            return Err(already_reviewed());
        }

        let rows = feedback.into_reviews(&booking).to_vec();
        match self
            .reviews
            .record_feedback(booking.id, ctx.user_id, rows)
            .await?
        {
            FeedbackOutcome::Recorded(reviews) => {
                info!(
                    booking_id = %booking.id,
                    customer_id = %ctx.user_id,
                    "Feedback recorded"
                );
                Ok(reviews)
            }
            FeedbackOutcome::AlreadyRecorded => Err(already_reviewed()),
        }
    }

    /// Reviews about the calling owner and their vehicles, newest first.
    pub async fn owner_ratings(&self, ctx: &RequestContext) -> AppResult<Vec<Review>> {
        ctx.require(UserRole::Owner)?;
        self.reviews.list_reviews_for_owner(ctx.user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert_eq!(rating(1, "Vehicle").unwrap(), 1);
        assert_eq!(rating(5, "Vehicle").unwrap(), 5);
        assert!(rating(0, "Vehicle").is_err());
        assert!(rating(6, "Owner").is_err());
        assert!(rating(i64::from(i16::MAX) + 1, "Owner").is_err());
    }
}
