//! Review repository.

use async_trait::async_trait;
use sqlx::PgPool;

use readygo_core::error::{AppError, ErrorKind};
use readygo_core::result::AppResult;
use readygo_core::types::{BookingId, UserId};
use readygo_entity::review::Review;

use super::db_error;
use crate::store::{FeedbackOutcome, ReviewStore};

/// PostgreSQL-backed [`ReviewStore`].
#[derive(Debug, Clone)]
pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    /// Create a new review repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

#[async_trait]
impl ReviewStore for ReviewRepository {
    async fn record_feedback(
        &self,
        booking_id: BookingId,
        customer: UserId,
        reviews: Vec<Review>,
    ) -> AppResult<FeedbackOutcome> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        let flagged = sqlx::query(
            "UPDATE bookings SET feedback_given = TRUE, updated_at = NOW() \
             WHERE id = $1 AND customer_id = $2 AND status = 'completed' \
             AND feedback_given = FALSE",
        )
        .bind(booking_id)
        .bind(customer)
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to flag booking feedback"))?;

        if flagged.rows_affected() == 0 {
            return Ok(FeedbackOutcome::AlreadyRecorded);
        }

        let mut stored = Vec::with_capacity(reviews.len());
        for review in &reviews {
            let inserted = sqlx::query_as::<_, Review>(
                "INSERT INTO reviews (id, booking_id, vehicle_id, reviewer_id, reviewee_id, \
                 aspect, rating, comment, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
            )
            .bind(review.id)
            .bind(review.booking_id)
            .bind(review.vehicle_id)
            .bind(review.reviewer_id)
            .bind(review.reviewee_id)
            .bind(review.aspect)
            .bind(review.rating)
            .bind(&review.comment)
            .bind(review.created_at)
            .fetch_one(&mut *tx)
            .await;

            match inserted {
                Ok(row) => stored.push(row),
                // Dropping the transaction rolls the flag back.
                Err(e) if is_unique_violation(&e) => return Ok(FeedbackOutcome::AlreadyRecorded),
                Err(e) => {
                    return Err(AppError::with_source(
                        ErrorKind::Database,
                        "Failed to store review",
                        e,
                    ));
                }
            }
        }

        tx.commit()
            .await
            .map_err(db_error("Failed to commit feedback"))?;
        Ok(FeedbackOutcome::Recorded(stored))
    }

    async fn has_review(&self, booking_id: BookingId, reviewer: UserId) -> AppResult<bool> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM reviews WHERE booking_id = $1 AND reviewer_id = $2)",
        )
        .bind(booking_id)
        .bind(reviewer)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to check existing review"))
    }

    async fn list_reviews_for_owner(&self, owner: UserId) -> AppResult<Vec<Review>> {
        sqlx::query_as::<_, Review>(
            "SELECT r.* FROM reviews r \
             WHERE r.reviewee_id = $1 \
                OR r.vehicle_id IN (SELECT id FROM vehicles WHERE owner_id = $1) \
             ORDER BY r.created_at DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list owner reviews"))
    }
}
