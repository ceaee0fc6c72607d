//! Store traits consumed by the service layer.
//!
//! Every state-changing method is a compare-and-swap: it applies only when the
//! stored row still matches the expected precondition, and it recomputes the
//! affected vehicle's availability inside the same unit of work. Callers learn
//! whether the swap happened from the returned outcome, never from a second
//! read.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use readygo_core::result::AppResult;
use readygo_core::types::{BookingId, DisputeId, UserId, VehicleId};
use readygo_entity::booking::{Booking, BookingStatus};
use readygo_entity::dispute::{DamageDispute, DisputeReply, NewDispute};
use readygo_entity::notification::Notification;
use readygo_entity::review::Review;
use readygo_entity::vehicle::Vehicle;

use crate::memory::MemoryStore;
use crate::repositories::{
    BookingRepository, DisputeRepository, NotificationRepository, ReviewRepository,
    VehicleRepository,
};

/// A conditional status change on one owner's booking.
#[derive(Debug, Clone)]
pub struct BookingTransition {
    /// Booking to move.
    pub booking_id: BookingId,
    /// Owner the booking must belong to.
    pub owner_id: UserId,
    /// Statuses the booking must currently be in.
    pub from: &'static [BookingStatus],
    /// Target status.
    pub to: BookingStatus,
    /// Pre-ride video URL to record with the change.
    pub pre_ride_video: Option<String>,
    /// Refuse the change if another booking or an open dispute holds the vehicle.
    pub require_vehicle_free: bool,
}

impl BookingTransition {
    /// A transition with no video and no vehicle check.
    ///
    /// Every status in `from` must be allowed to move to `to`.
    pub fn new(
        booking_id: BookingId,
        owner_id: UserId,
        from: &'static [BookingStatus],
        to: BookingStatus,
    ) -> Self {
        debug_assert!(
            !from.is_empty() && from.iter().all(|s| s.can_transition_to(to)),
            "illegal booking transition {from:?} -> {to}"
        );
        Self {
            booking_id,
            owner_id,
            from,
            to,
            pre_ride_video: None,
            require_vehicle_free: false,
        }
    }

    /// Record `url` as the pre-ride video.
    pub fn with_video(mut self, url: impl Into<String>) -> Self {
        self.pre_ride_video = Some(url.into());
        self
    }

    /// Require the vehicle to be free of other locks.
    pub fn exclusive(mut self) -> Self {
        self.require_vehicle_free = true;
        self
    }

    /// Whether applying the change can alter vehicle availability.
    pub fn touches_availability(&self) -> bool {
        self.to != BookingStatus::Cancelled
    }
}

/// Result of [`BookingStore::transition`].
#[derive(Debug, Clone)]
pub enum TransitionOutcome {
    /// The change was applied; carries the updated booking.
    Applied(Booking),
    /// No booking matched id, owner and expected status.
    NotMatched,
    /// The vehicle is held by another booking or an open dispute.
    VehicleOccupied,
}

/// Result of [`ReviewStore::record_feedback`].
#[derive(Debug, Clone)]
pub enum FeedbackOutcome {
    /// Both review rows were stored and the booking flagged.
    Recorded(Vec<Review>),
    /// Feedback already exists, or the booking is no longer eligible.
    AlreadyRecorded,
}

/// Vehicle reads plus the seed insert.
#[async_trait]
pub trait VehicleStore: Send + Sync + std::fmt::Debug {
    /// Store a new vehicle.
    async fn insert_vehicle(&self, vehicle: &Vehicle) -> AppResult<()>;

    /// Find a vehicle by id.
    async fn find_vehicle(&self, id: VehicleId) -> AppResult<Option<Vehicle>>;

    /// Number of vehicles listed by `owner`.
    async fn count_vehicles_for_owner(&self, owner: UserId) -> AppResult<i64>;
}

/// Booking persistence.
#[async_trait]
pub trait BookingStore: Send + Sync + std::fmt::Debug {
    /// Store a new `Pending` booking.
    async fn insert_booking(&self, booking: &Booking) -> AppResult<()>;

    /// Find a booking by id.
    async fn find_booking(&self, id: BookingId) -> AppResult<Option<Booking>>;

    /// A customer's bookings, latest start date first.
    async fn list_bookings_for_customer(&self, customer: UserId) -> AppResult<Vec<Booking>>;

    /// An owner's bookings, newest first.
    async fn list_bookings_for_owner(&self, owner: UserId) -> AppResult<Vec<Booking>>;

    /// Every booking, newest first.
    async fn list_all_bookings(&self) -> AppResult<Vec<Booking>>;

    /// Apply a conditional status change.
    async fn transition(&self, change: BookingTransition) -> AppResult<TransitionOutcome>;
}

/// Damage dispute persistence.
#[async_trait]
pub trait DisputeStore: Send + Sync + std::fmt::Debug {
    /// Move an owner's booking into `Disputed` and open the dispute in one
    /// unit of work. Returns `None` when the booking is not owned by `owner`
    /// or not in a disputable status.
    async fn open_dispute(
        &self,
        booking_id: BookingId,
        owner: UserId,
        dispute: NewDispute,
    ) -> AppResult<Option<DamageDispute>>;

    /// Find a dispute with its replies.
    async fn find_dispute(&self, id: DisputeId) -> AppResult<Option<DamageDispute>>;

    /// An owner's disputes, newest first.
    async fn list_disputes_for_owner(&self, owner: UserId) -> AppResult<Vec<DamageDispute>>;

    /// Every dispute, newest first.
    async fn list_all_disputes(&self) -> AppResult<Vec<DamageDispute>>;

    /// Append an arbitration reply. Returns `false` if the dispute is unknown.
    async fn add_reply(&self, reply: &DisputeReply) -> AppResult<bool>;

    /// Conditionally close an open dispute and release its vehicle lock.
    /// Returns `None` when the dispute is unknown or already resolved.
    async fn resolve_dispute(&self, id: DisputeId) -> AppResult<Option<DamageDispute>>;
}

/// Review persistence.
#[async_trait]
pub trait ReviewStore: Send + Sync + std::fmt::Debug {
    /// Flag the booking's feedback as given and store its review rows, all or
    /// nothing. Applies only to a `Completed` booking of `customer` whose
    /// feedback flag is still unset.
    async fn record_feedback(
        &self,
        booking_id: BookingId,
        customer: UserId,
        reviews: Vec<Review>,
    ) -> AppResult<FeedbackOutcome>;

    /// Whether `reviewer` already reviewed `booking_id`.
    async fn has_review(&self, booking_id: BookingId, reviewer: UserId) -> AppResult<bool>;

    /// Reviews about `owner` or the owner's vehicles, newest first.
    async fn list_reviews_for_owner(&self, owner: UserId) -> AppResult<Vec<Review>>;
}

/// Notification persistence.
#[async_trait]
pub trait NotificationStore: Send + Sync + std::fmt::Debug {
    /// Store a notification.
    async fn insert_notification(&self, notification: &Notification) -> AppResult<()>;

    /// A user's notifications, newest first.
    async fn list_notifications_for_user(&self, user: UserId) -> AppResult<Vec<Notification>>;
}

/// The full set of stores handed to the service layer.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Vehicle store.
    pub vehicles: Arc<dyn VehicleStore>,
    /// Booking store.
    pub bookings: Arc<dyn BookingStore>,
    /// Dispute store.
    pub disputes: Arc<dyn DisputeStore>,
    /// Review store.
    pub reviews: Arc<dyn ReviewStore>,
    /// Notification store.
    pub notifications: Arc<dyn NotificationStore>,
}

impl Stores {
    /// Back every store by one in-memory state.
    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            vehicles: store.clone(),
            bookings: store.clone(),
            disputes: store.clone(),
            reviews: store.clone(),
            notifications: store,
        }
    }

    /// Back every store by PostgreSQL.
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            vehicles: Arc::new(VehicleRepository::new(pool.clone())),
            bookings: Arc::new(BookingRepository::new(pool.clone())),
            disputes: Arc::new(DisputeRepository::new(pool.clone())),
            reviews: Arc::new(ReviewRepository::new(pool.clone())),
            notifications: Arc::new(NotificationRepository::new(pool)),
        }
    }
}
