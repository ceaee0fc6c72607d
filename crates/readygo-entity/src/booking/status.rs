//! Booking lifecycle states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a booking.
///
/// ```text
/// Pending ──confirm──▶ Confirmed ──complete──▶ Completed
///    │                    │                       │
///    └──reject──▶ Cancelled └──report damage──▶ Disputed ◀┘
/// ```
///
/// `Upcoming` is a legacy spelling of `Confirmed` found in older rows. It is
/// accepted on read and behaves exactly like `Confirmed`, but no transition
/// ever produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Requested by the customer, awaiting the owner.
    Pending,
    /// Accepted by the owner with a pre-ride video; the vehicle is locked.
    Confirmed,
    /// Legacy alias of `Confirmed`.
    Upcoming,
    /// Ride finished; the vehicle is released.
    Completed,
    /// Rejected by the owner.
    Cancelled,
    /// A damage dispute was opened against this booking.
    Disputed,
}

impl BookingStatus {
    /// Statuses that may be confirmed or rejected.
    pub const AWAITING_OWNER: &'static [BookingStatus] = &[Self::Pending];

    /// Statuses that lock the vehicle and may be completed.
    pub const ACTIVE: &'static [BookingStatus] = &[Self::Confirmed, Self::Upcoming];

    /// Statuses a damage dispute may be opened from.
    pub const DISPUTABLE: &'static [BookingStatus] =
        &[Self::Confirmed, Self::Upcoming, Self::Completed];

    /// Whether the booking currently holds the vehicle.
    pub fn is_active(&self) -> bool {
        Self::ACTIVE.contains(self)
    }

    /// Check whether `self → next` is a legal transition.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        match next {
            Self::Confirmed | Self::Cancelled => Self::AWAITING_OWNER.contains(self),
            Self::Completed => self.is_active(),
            Self::Disputed => Self::DISPUTABLE.contains(self),
            Self::Pending | Self::Upcoming => false,
        }
    }

    /// Return the status as its stored string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Upcoming => "upcoming",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Disputed => "disputed",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
