//! Damage dispute manager.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use readygo_core::error::AppError;
use readygo_core::result::AppResult;
use readygo_core::types::{BookingId, DisputeId, ReplyId};
use readygo_database::store::{BookingStore, DisputeStore, Stores, VehicleStore};
use readygo_entity::booking::BookingStatus;
use readygo_entity::dispute::{DamageDispute, DisputeReply, NewDispute};
use readygo_entity::notification::NewNotification;
use readygo_entity::user::UserRole;

use crate::booking::service::{already_actioned, vehicle_name};
use crate::context::RequestContext;
use crate::media::{EvidenceUpload, EvidenceUploader};
use crate::notification::Notifier;

/// Opens damage disputes and exposes them to arbitration.
#[derive(Debug, Clone)]
pub struct DisputeService {
    bookings: Arc<dyn BookingStore>,
    vehicles: Arc<dyn VehicleStore>,
    disputes: Arc<dyn DisputeStore>,
    uploader: Arc<EvidenceUploader>,
    notifier: Notifier,
}

impl DisputeService {
    /// Creates a new dispute service.
    pub fn new(stores: &Stores, uploader: Arc<EvidenceUploader>, notifier: Notifier) -> Self {
        Self {
            bookings: stores.bookings.clone(),
            vehicles: stores.vehicles.clone(),
            disputes: stores.disputes.clone(),
            uploader,
            notifier,
        }
    }

    /// Reports damage on an ended booking.
    ///
    /// The booking moves to `Disputed` and the vehicle stays locked until an
    /// administrator resolves the dispute.
    pub async fn report_damage(
        &self,
        ctx: &RequestContext,
        booking_id: BookingId,
        description: &str,
        video: Option<EvidenceUpload>,
    ) -> AppResult<DamageDispute> {
        ctx.require(UserRole::Owner)?;
        let description = description.trim();
        if description.is_empty() {
            return Err(AppError::validation("Damage description is required"));
        }
        let video = self.uploader.validate(video, "Damage video")?;

        let booking = self
            .bookings
            .find_booking(booking_id)
            .await?
            .filter(|b| b.owner_id == ctx.user_id)
            .ok_or_else(|| AppError::not_found("Booking not found for this owner"))?;

        if !booking.has_ended(ctx.today()) {
            return Err(AppError::validation(
                "Cannot report damage before the booking end date",
            ));
        }
        if !BookingStatus::DISPUTABLE.contains(&booking.status) {
            return Err(already_actioned(booking_id));
        }

        let stored = self.uploader.upload(video).await?;
        let request = NewDispute {
            description: description.to_string(),
            damage_video: stored.url.clone(),
        };

        let failure = match self
            .disputes
            .open_dispute(booking_id, ctx.user_id, request)
            .await
        {
            Ok(Some(dispute)) => {
                info!(
                    dispute_id = %dispute.id,
                    booking_id = %booking_id,
                    vehicle_id = %dispute.vehicle_id,
                    video_key = %stored.key,
                    "Damage reported"
                );
                let name = vehicle_name(self.vehicles.as_ref(), dispute.vehicle_id).await;
                self.notifier
                    .notify(NewNotification::linked(
                        dispute.customer_id,
                        format!(
                            "The owner reported damage on {name} after your ride ending {}. \
                             An administrator will review it.",
                            booking.end_date
                        ),
                        "/history",
                    ))
                    .await;
                return Ok(dispute);
            }
            Ok(None) => already_actioned(booking_id),
            Err(e) => e,
        };

        warn!(
            booking_id = %booking_id,
            video_key = %stored.key,
            error = %failure,
            "Damage report failed after upload; discarding video"
        );
        self.uploader.discard(&stored.key).await;
        Err(failure)
    }

    /// The calling owner's disputes, newest first.
    pub async fn list_for_owner(&self, ctx: &RequestContext) -> AppResult<Vec<DamageDispute>> {
        ctx.require(UserRole::Owner)?;
        self.disputes.list_disputes_for_owner(ctx.user_id).await
    }

    /// Every dispute, for administrators.
    pub async fn list_all(&self, ctx: &RequestContext) -> AppResult<Vec<DamageDispute>> {
        ctx.require(UserRole::Admin)?;
        self.disputes.list_all_disputes().await
    }

    /// A dispute visible to its owner, its customer, or an administrator.
    pub async fn get(&self, ctx: &RequestContext, id: DisputeId) -> AppResult<DamageDispute> {
        self.disputes
            .find_dispute(id)
            .await?
            .filter(|d| ctx.role == UserRole::Admin || d.involves(ctx.user_id))
            .ok_or_else(|| AppError::not_found("Damage report not found"))
    }

    /// Appends an administrator reply.
    pub async fn reply(
        &self,
        ctx: &RequestContext,
        id: DisputeId,
        message: &str,
    ) -> AppResult<DamageDispute> {
        ctx.require(UserRole::Admin)?;
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::validation("Reply message is required"));
        }

        let reply = DisputeReply {
            id: ReplyId::new(),
            dispute_id: id,
            admin_id: ctx.user_id,
            message: message.to_string(),
            created_at: Utc::now(),
        };
        if !self.disputes.add_reply(&reply).await? {
            return Err(AppError::not_found("Damage report not found"));
        }

        let dispute = self.get(ctx, id).await?;
        info!(dispute_id = %id, admin_id = %ctx.user_id, "Dispute reply added");
        self.notify_parties(&dispute, "An administrator replied to your damage report.")
            .await;
        Ok(dispute)
    }

    /// Closes an open dispute and releases its vehicle lock.
    pub async fn resolve(&self, ctx: &RequestContext, id: DisputeId) -> AppResult<DamageDispute> {
        ctx.require(UserRole::Admin)?;
        let current = self.get(ctx, id).await?;
        if !current.status.is_open() {
            return Err(AppError::conflict(format!(
                "Damage report {id} is already resolved"
            )));
        }

        let resolved = self
            .disputes
            .resolve_dispute(id)
            .await?
            .ok_or_else(|| AppError::conflict(format!("Damage report {id} is already resolved")))?;

        info!(dispute_id = %id, admin_id = %ctx.user_id, "Dispute resolved");
        self.notify_parties(&resolved, "Your damage report has been resolved.")
            .await;
        Ok(resolved)
    }

    async fn notify_parties(&self, dispute: &DamageDispute, message: &str) {
        self.notifier
            .notify(NewNotification::linked(
                dispute.owner_id,
                message,
                "/owner/damage-reports",
            ))
            .await;
        self.notifier
            .notify(NewNotification::linked(dispute.customer_id, message, "/history"))
            .await;
    }
}
