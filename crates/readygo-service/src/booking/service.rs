//! Booking state machine.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use readygo_core::error::AppError;
use readygo_core::result::AppResult;
use readygo_core::types::{BookingId, UserId, VehicleId};
use readygo_database::store::{
    BookingStore, BookingTransition, Stores, TransitionOutcome, VehicleStore,
};
use readygo_entity::booking::{Booking, BookingStatus, CreateBooking};
use readygo_entity::notification::NewNotification;
use readygo_entity::user::UserRole;

use super::pricing;
use crate::context::RequestContext;
use crate::media::{EvidenceUpload, EvidenceUploader};
use crate::notification::Notifier;

/// Request to rent a vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    /// Vehicle to rent.
    pub vehicle_id: VehicleId,
    /// Owner the client believes lists the vehicle.
    pub owner_id: UserId,
    /// First rental day.
    pub start_date: NaiveDate,
    /// Last rental day.
    pub end_date: NaiveDate,
    /// Price shown to the client; ignored in favour of the server quote.
    #[serde(default)]
    pub client_price: Option<i64>,
}

/// Drives bookings through `Pending → Confirmed | Cancelled → Completed`.
#[derive(Debug, Clone)]
pub struct BookingService {
    bookings: Arc<dyn BookingStore>,
    vehicles: Arc<dyn VehicleStore>,
    uploader: Arc<EvidenceUploader>,
    notifier: Notifier,
}

/// Error for a booking that no longer matches the expected status.
pub(crate) fn already_actioned(id: BookingId) -> AppError {
    AppError::conflict(format!("Booking {id} has already been actioned"))
}

impl BookingService {
    /// Creates a new booking service.
    pub fn new(stores: &Stores, uploader: Arc<EvidenceUploader>, notifier: Notifier) -> Self {
        Self {
            bookings: stores.bookings.clone(),
            vehicles: stores.vehicles.clone(),
            uploader,
            notifier,
        }
    }

    /// Creates a `Pending` booking for the calling customer.
    pub async fn create_booking(
        &self,
        ctx: &RequestContext,
        req: CreateBookingRequest,
    ) -> AppResult<Booking> {
        ctx.require(UserRole::Customer)?;
        if req.end_date < req.start_date {
            return Err(AppError::validation(
                "End date must be on or after the start date",
            ));
        }

        let vehicle = self
            .vehicles
            .find_vehicle(req.vehicle_id)
            .await?
            .ok_or_else(|| AppError::not_found("Vehicle not found"))?;

        if vehicle.owner_id != req.owner_id {
            return Err(AppError::validation(
                "Owner ID mismatch for the selected vehicle",
            ));
        }
        if !vehicle.is_available {
            return Err(AppError::conflict(
                "Vehicle is not available for the selected dates",
            ));
        }

        let total_price = pricing::quote(req.start_date, req.end_date, vehicle.daily_rate)?;
        if let Some(client_price) = req.client_price.filter(|p| *p != total_price) {
            debug!(
                vehicle_id = %vehicle.id,
                client_price,
                total_price,
                "Ignoring client-supplied price"
            );
        }

        let booking = CreateBooking {
            customer_id: ctx.user_id,
            owner_id: vehicle.owner_id,
            vehicle_id: vehicle.id,
            start_date: req.start_date,
            end_date: req.end_date,
            total_price,
        }
        .into_booking();
        self.bookings.insert_booking(&booking).await?;

        info!(
            booking_id = %booking.id,
            customer_id = %ctx.user_id,
            vehicle_id = %vehicle.id,
            total_price,
            "Booking requested"
        );

        self.notifier
            .notify(NewNotification::linked(
                booking.owner_id,
                format!(
                    "New booking request for {} from {}.",
                    vehicle.name, booking.start_date
                ),
                "/owner/orders",
            ))
            .await;

        Ok(booking)
    }

    /// Confirms a pending booking with a pre-ride evidence video.
    pub async fn confirm_booking(
        &self,
        ctx: &RequestContext,
        booking_id: BookingId,
        video: Option<EvidenceUpload>,
    ) -> AppResult<Booking> {
        ctx.require(UserRole::Owner)?;
        let video = self.uploader.validate(video, "Pre-ride video")?;

        let booking = self.owned_booking(ctx, booking_id).await?;
        if booking.status != BookingStatus::Pending {
            return Err(already_actioned(booking_id));
        }

        let stored = self.uploader.upload(video).await?;

        let change = BookingTransition::new(
            booking_id,
            ctx.user_id,
            BookingStatus::AWAITING_OWNER,
            BookingStatus::Confirmed,
        )
        .with_video(stored.url.clone())
        .exclusive();

        let rejected = match self.bookings.transition(change).await {
            Ok(TransitionOutcome::Applied(confirmed)) => {
                info!(
                    booking_id = %confirmed.id,
                    owner_id = %ctx.user_id,
                    video_key = %stored.key,
                    "Booking confirmed"
                );
                self.notify_customer(
                    &confirmed,
                    |name| {
                        format!(
                            "Your booking for {name} from {} has been confirmed. \
                             You can view the pre-ride video.",
                            confirmed.start_date
                        )
                    },
                    "/history",
                )
                .await;
                return Ok(confirmed);
            }
            Ok(TransitionOutcome::NotMatched) => already_actioned(booking_id),
            Ok(TransitionOutcome::VehicleOccupied) => AppError::conflict(
                "Vehicle is already booked or under damage review",
            ),
            Err(e) => e,
        };

        warn!(
            booking_id = %booking_id,
            video_key = %stored.key,
            error = %rejected,
            "Confirmation failed after upload; discarding video"
        );
        self.uploader.discard(&stored.key).await;
        Err(rejected)
    }

    /// Rejects a pending booking.
    pub async fn reject_booking(
        &self,
        ctx: &RequestContext,
        booking_id: BookingId,
    ) -> AppResult<Booking> {
        ctx.require(UserRole::Owner)?;
        let booking = self.owned_booking(ctx, booking_id).await?;
        if booking.status != BookingStatus::Pending {
            return Err(already_actioned(booking_id));
        }

        let change = BookingTransition::new(
            booking_id,
            ctx.user_id,
            BookingStatus::AWAITING_OWNER,
            BookingStatus::Cancelled,
        );
        let rejected = match self.bookings.transition(change).await? {
            TransitionOutcome::Applied(b) => b,
            _ => return Err(already_actioned(booking_id)),
        };

        info!(booking_id = %booking_id, owner_id = %ctx.user_id, "Booking rejected");
        self.notify_customer(
            &rejected,
            |name| {
                format!(
                    "Unfortunately, your booking request for {name} from {} was rejected by the owner.",
                    rejected.start_date
                )
            },
            "/vehicle-search",
        )
        .await;
        Ok(rejected)
    }

    /// Completes a confirmed booking and releases the vehicle.
    pub async fn complete_booking(
        &self,
        ctx: &RequestContext,
        booking_id: BookingId,
    ) -> AppResult<Booking> {
        ctx.require(UserRole::Owner)?;
        let booking = self.owned_booking(ctx, booking_id).await?;
        if !booking.status.is_active() {
            return Err(already_actioned(booking_id));
        }

        let change = BookingTransition::new(
            booking_id,
            ctx.user_id,
            BookingStatus::ACTIVE,
            BookingStatus::Completed,
        );
        let completed = match self.bookings.transition(change).await? {
            TransitionOutcome::Applied(b) => b,
            _ => return Err(already_actioned(booking_id)),
        };

        info!(booking_id = %booking_id, owner_id = %ctx.user_id, "Booking completed");
        self.notify_customer(
            &completed,
            |name| {
                format!(
                    "Your ride for {name} ending {} is marked complete. Please leave feedback!",
                    completed.end_date
                )
            },
            "/history",
        )
        .await;
        Ok(completed)
    }

    /// The calling customer's bookings, latest start date first.
    pub async fn list_for_customer(&self, ctx: &RequestContext) -> AppResult<Vec<Booking>> {
        ctx.require(UserRole::Customer)?;
        self.bookings.list_bookings_for_customer(ctx.user_id).await
    }

    /// The calling owner's bookings, newest first.
    pub async fn list_for_owner(&self, ctx: &RequestContext) -> AppResult<Vec<Booking>> {
        ctx.require(UserRole::Owner)?;
        self.bookings.list_bookings_for_owner(ctx.user_id).await
    }

    /// Every booking, for administrators.
    pub async fn list_all(&self, ctx: &RequestContext) -> AppResult<Vec<Booking>> {
        ctx.require(UserRole::Admin)?;
        self.bookings.list_all_bookings().await
    }

    /// Loads a booking the calling owner may act on.
    async fn owned_booking(&self, ctx: &RequestContext, id: BookingId) -> AppResult<Booking> {
        self.bookings
            .find_booking(id)
            .await?
            .filter(|b| b.owner_id == ctx.user_id)
            .ok_or_else(|| AppError::not_found("Booking not found for this owner"))
    }

    async fn notify_customer(
        &self,
        booking: &Booking,
        message: impl FnOnce(&str) -> String,
        link: &str,
    ) {
        let name = vehicle_name(self.vehicles.as_ref(), booking.vehicle_id).await;
        self.notifier
            .notify(NewNotification::linked(
                booking.customer_id,
                message(&name),
                link,
            ))
            .await;
    }
}

/// Display name of a vehicle for notification text.
pub(crate) async fn vehicle_name(vehicles: &dyn VehicleStore, id: VehicleId) -> String {
    match vehicles.find_vehicle(id).await {
        Ok(Some(v)) => v.name,
        _ => "your vehicle".to_string(),
    }
}
