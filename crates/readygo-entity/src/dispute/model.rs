//! Damage dispute entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use readygo_core::types::{BookingId, DisputeId, ReplyId, UserId, VehicleId};

use super::status::DisputeStatus;
use crate::booking::Booking;

/// A damage claim raised by an owner after a rental ended.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DamageDispute {
    /// Unique dispute identifier.
    pub id: DisputeId,
    /// Disputed booking.
    pub booking_id: BookingId,
    /// Owner who reported the damage.
    pub owner_id: UserId,
    /// Customer of the disputed booking.
    pub customer_id: UserId,
    /// Vehicle the damage concerns.
    pub vehicle_id: VehicleId,
    /// Owner's description of the damage.
    pub description: String,
    /// Pre-ride video copied from the booking, if any.
    pub pre_ride_video: Option<String>,
    /// Post-ride damage video.
    pub damage_video: String,
    /// Arbitration status.
    pub status: DisputeStatus,
    /// Administrator replies, oldest first.
    #[sqlx(skip)]
    #[serde(default)]
    pub replies: Vec<DisputeReply>,
    /// When the dispute was opened.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl DamageDispute {
    /// Whether `user` may see this dispute as a participant.
    pub fn involves(&self, user: UserId) -> bool {
        self.owner_id == user || self.customer_id == user
    }
}

/// An administrator reply appended to a dispute.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DisputeReply {
    /// Unique reply identifier.
    pub id: ReplyId,
    /// Dispute the reply belongs to.
    #[serde(skip)]
    pub dispute_id: DisputeId,
    /// Administrator who wrote the reply.
    pub admin_id: UserId,
    /// Reply text.
    pub message: String,
    /// When the reply was written.
    pub created_at: DateTime<Utc>,
}

/// Data required to open a dispute against a booking.
#[derive(Debug, Clone)]
pub struct NewDispute {
    /// Trimmed, non-empty damage description.
    pub description: String,
    /// Uploaded damage video URL.
    pub damage_video: String,
}

impl NewDispute {
    /// Build the stored dispute row, copying identities from `booking`.
    pub fn into_dispute(self, booking: &Booking) -> DamageDispute {
        let now = Utc::now();
        DamageDispute {
            id: DisputeId::new(),
            booking_id: booking.id,
            owner_id: booking.owner_id,
            customer_id: booking.customer_id,
            vehicle_id: booking.vehicle_id,
            description: self.description,
            pre_ride_video: booking.pre_ride_video.clone(),
            damage_video: self.damage_video,
            status: DisputeStatus::PendingReview,
            replies: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
