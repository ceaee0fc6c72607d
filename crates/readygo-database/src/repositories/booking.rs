//! Booking repository.

use async_trait::async_trait;
use sqlx::PgPool;

use readygo_core::result::AppResult;
use readygo_core::types::{BookingId, UserId};
use readygo_entity::booking::{Booking, BookingStatus};

use super::{availability, db_error};
use crate::store::{BookingStore, BookingTransition, TransitionOutcome};

/// PostgreSQL-backed [`BookingStore`].
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    /// Create a new booking repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Render a status set for `status::text = ANY($n)`.
pub(crate) fn status_names(statuses: &[BookingStatus]) -> Vec<String> {
    statuses.iter().map(|s| s.as_str().to_string()).collect()
}

#[async_trait]
impl BookingStore for BookingRepository {
    async fn insert_booking(&self, booking: &Booking) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO bookings (id, customer_id, owner_id, vehicle_id, start_date, end_date, \
             total_price, status, pre_ride_video, feedback_given, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(booking.id)
        .bind(booking.customer_id)
        .bind(booking.owner_id)
        .bind(booking.vehicle_id)
        .bind(booking.start_date)
        .bind(booking.end_date)
        .bind(booking.total_price)
        .bind(booking.status)
        .bind(&booking.pre_ride_video)
        .bind(booking.feedback_given)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to create booking"))?;
        Ok(())
    }

    async fn find_booking(&self, id: BookingId) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find booking"))
    }

    async fn list_bookings_for_customer(&self, customer: UserId) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE customer_id = $1 ORDER BY start_date DESC, created_at DESC",
        )
        .bind(customer)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list customer bookings"))
    }

    async fn list_bookings_for_owner(&self, owner: UserId) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list owner bookings"))
    }

    async fn list_all_bookings(&self) -> AppResult<Vec<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list bookings"))
    }

    async fn transition(&self, change: BookingTransition) -> AppResult<TransitionOutcome> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;

        if change.touches_availability() {
            // Serializes every availability change on the vehicle.
            let Some(vehicle) =
                availability::lock_for_booking(&mut *tx, change.booking_id, change.owner_id)
                    .await?
            else {
                return Ok(TransitionOutcome::NotMatched);
            };
            if change.require_vehicle_free
                && availability::is_held_elsewhere(&mut *tx, vehicle, change.booking_id).await?
            {
                return Ok(TransitionOutcome::VehicleOccupied);
            }
        }

        let updated = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = $3, \
             pre_ride_video = COALESCE($4, pre_ride_video), updated_at = NOW() \
             WHERE id = $1 AND owner_id = $2 AND status::text = ANY($5) \
             RETURNING *",
        )
        .bind(change.booking_id)
        .bind(change.owner_id)
        .bind(change.to)
        .bind(&change.pre_ride_video)
        .bind(status_names(change.from))
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to update booking status"))?;

        let Some(booking) = updated else {
            return Ok(TransitionOutcome::NotMatched);
        };

        if change.touches_availability() {
            availability::recompute(&mut *tx, booking.vehicle_id).await?;
        }

        tx.commit()
            .await
            .map_err(db_error("Failed to commit booking transition"))?;
        Ok(TransitionOutcome::Applied(booking))
    }
}
