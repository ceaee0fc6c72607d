//! Booking entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use readygo_core::types::{BookingId, UserId, VehicleId};

use super::status::BookingStatus;

/// A single rental agreement between a customer and an owner.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    /// Unique booking identifier.
    pub id: BookingId,
    /// Customer who requested the rental.
    pub customer_id: UserId,
    /// Owner of the rented vehicle.
    pub owner_id: UserId,
    /// Rented vehicle.
    pub vehicle_id: VehicleId,
    /// First rental day.
    pub start_date: NaiveDate,
    /// Last rental day (inclusive, never before `start_date`).
    pub end_date: NaiveDate,
    /// Price computed at creation from day count and daily rate.
    pub total_price: i64,
    /// Lifecycle status.
    pub status: BookingStatus,
    /// URL of the pre-ride evidence video, set on confirmation.
    pub pre_ride_video: Option<String>,
    /// Whether the customer has already left feedback.
    pub feedback_given: bool,
    /// When the booking was requested.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Number of rental days, counting both ends.
    pub fn rental_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Whether the rental period is over on `today`.
    pub fn has_ended(&self, today: NaiveDate) -> bool {
        today >= self.end_date
    }
}

/// Data required to create a new booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBooking {
    /// Requesting customer.
    pub customer_id: UserId,
    /// Owner of the vehicle.
    pub owner_id: UserId,
    /// Vehicle being rented.
    pub vehicle_id: VehicleId,
    /// First rental day.
    pub start_date: NaiveDate,
    /// Last rental day.
    pub end_date: NaiveDate,
    /// Server-computed price.
    pub total_price: i64,
}

impl CreateBooking {
    /// Build the stored `Pending` row for this request.
    pub fn into_booking(self) -> Booking {
        let now = Utc::now();
        Booking {
            id: BookingId::new(),
            customer_id: self.customer_id,
            owner_id: self.owner_id,
            vehicle_id: self.vehicle_id,
            start_date: self.start_date,
            end_date: self.end_date,
            total_price: self.total_price,
            status: BookingStatus::Pending,
            pre_ride_video: None,
            feedback_given: false,
            created_at: now,
            updated_at: now,
        }
    }
}
