//! In-memory store.
//!
//! All five store traits share one state behind a single async mutex, so each
//! compare-and-swap (status check, write and availability recompute) runs in
//! one critical section, like a database transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use readygo_core::result::AppResult;
use readygo_core::types::{BookingId, DisputeId, UserId, VehicleId};
use readygo_entity::booking::{Booking, BookingStatus};
use readygo_entity::dispute::{DamageDispute, DisputeReply, DisputeStatus, NewDispute};
use readygo_entity::notification::Notification;
use readygo_entity::review::Review;
use readygo_entity::vehicle::Vehicle;

use crate::store::{
    BookingStore, BookingTransition, DisputeStore, FeedbackOutcome, NotificationStore,
    ReviewStore, TransitionOutcome, VehicleStore,
};

#[derive(Debug, Default)]
struct State {
    vehicles: HashMap<VehicleId, Vehicle>,
    bookings: HashMap<BookingId, Booking>,
    disputes: HashMap<DisputeId, DamageDispute>,
    reviews: Vec<Review>,
    notifications: Vec<Notification>,
}

impl State {
    fn held_by_booking(&self, vehicle: VehicleId, except: Option<BookingId>) -> bool {
        self.bookings.values().any(|b| {
            b.vehicle_id == vehicle && b.status.is_active() && Some(b.id) != except
        })
    }

    fn held_by_dispute(&self, vehicle: VehicleId) -> bool {
        self.disputes
            .values()
            .any(|d| d.vehicle_id == vehicle && d.status.is_open())
    }

    fn recompute_availability(&mut self, vehicle: VehicleId) {
        let available = !(self.held_by_booking(vehicle, None) || self.held_by_dispute(vehicle));
        if let Some(v) = self.vehicles.get_mut(&vehicle) {
            v.is_available = available;
            v.updated_at = Utc::now();
        }
    }

    fn owned_booking_in(
        &mut self,
        id: BookingId,
        owner: UserId,
        from: &[BookingStatus],
    ) -> Option<&mut Booking> {
        self.bookings
            .get_mut(&id)
            .filter(|b| b.owner_id == owner && from.contains(&b.status))
    }
}

fn newest_first<T, K: Ord>(mut rows: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
    rows
}

/// Store backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VehicleStore for MemoryStore {
    async fn insert_vehicle(&self, vehicle: &Vehicle) -> AppResult<()> {
        self.state
            .lock()
            .await
            .vehicles
            .insert(vehicle.id, vehicle.clone());
        Ok(())
    }

    async fn find_vehicle(&self, id: VehicleId) -> AppResult<Option<Vehicle>> {
        Ok(self.state.lock().await.vehicles.get(&id).cloned())
    }

    async fn count_vehicles_for_owner(&self, owner: UserId) -> AppResult<i64> {
        let state = self.state.lock().await;
        Ok(state.vehicles.values().filter(|v| v.owner_id == owner).count() as i64)
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn insert_booking(&self, booking: &Booking) -> AppResult<()> {
        self.state
            .lock()
            .await
            .bookings
            .insert(booking.id, booking.clone());
        Ok(())
    }

    async fn find_booking(&self, id: BookingId) -> AppResult<Option<Booking>> {
        Ok(self.state.lock().await.bookings.get(&id).cloned())
    }

    async fn list_bookings_for_customer(&self, customer: UserId) -> AppResult<Vec<Booking>> {
        let state = self.state.lock().await;
        let rows = state
            .bookings
            .values()
            .filter(|b| b.customer_id == customer)
            .cloned()
            .collect();
        Ok(newest_first(rows, |b| (b.start_date, b.created_at)))
    }

    async fn list_bookings_for_owner(&self, owner: UserId) -> AppResult<Vec<Booking>> {
        let state = self.state.lock().await;
        let rows = state
            .bookings
            .values()
            .filter(|b| b.owner_id == owner)
            .cloned()
            .collect();
        Ok(newest_first(rows, |b| b.created_at))
    }

    async fn list_all_bookings(&self) -> AppResult<Vec<Booking>> {
        let state = self.state.lock().await;
        let rows = state.bookings.values().cloned().collect();
        Ok(newest_first(rows, |b| b.created_at))
    }

    async fn transition(&self, change: BookingTransition) -> AppResult<TransitionOutcome> {
        let mut state = self.state.lock().await;

        let Some(vehicle) = state
            .owned_booking_in(change.booking_id, change.owner_id, change.from)
            .map(|b| b.vehicle_id)
        else {
            return Ok(TransitionOutcome::NotMatched);
        };

        if change.require_vehicle_free
            && (state.held_by_booking(vehicle, Some(change.booking_id))
                || state.held_by_dispute(vehicle))
        {
            return Ok(TransitionOutcome::VehicleOccupied);
        }

        let touches_availability = change.touches_availability();
        let Some(booking) = state.bookings.get_mut(&change.booking_id) else {
            return Ok(TransitionOutcome::NotMatched);
        };
        booking.status = change.to;
        if let Some(url) = change.pre_ride_video {
            booking.pre_ride_video = Some(url);
        }
        booking.updated_at = Utc::now();
        let updated = booking.clone();

        if touches_availability {
            state.recompute_availability(vehicle);
        }
        Ok(TransitionOutcome::Applied(updated))
    }
}

#[async_trait]
impl DisputeStore for MemoryStore {
    async fn open_dispute(
        &self,
        booking_id: BookingId,
        owner: UserId,
        dispute: NewDispute,
    ) -> AppResult<Option<DamageDispute>> {
        let mut state = self.state.lock().await;

        let Some(booking) = state.owned_booking_in(booking_id, owner, BookingStatus::DISPUTABLE)
        else {
            return Ok(None);
        };
        booking.status = BookingStatus::Disputed;
        booking.updated_at = Utc::now();

        let record = dispute.into_dispute(booking);
        let vehicle = record.vehicle_id;
        state.disputes.insert(record.id, record.clone());
        state.recompute_availability(vehicle);
        Ok(Some(record))
    }

    async fn find_dispute(&self, id: DisputeId) -> AppResult<Option<DamageDispute>> {
        Ok(self.state.lock().await.disputes.get(&id).cloned())
    }

    async fn list_disputes_for_owner(&self, owner: UserId) -> AppResult<Vec<DamageDispute>> {
        let state = self.state.lock().await;
        let rows = state
            .disputes
            .values()
            .filter(|d| d.owner_id == owner)
            .cloned()
            .collect();
        Ok(newest_first(rows, |d| d.created_at))
    }

    async fn list_all_disputes(&self) -> AppResult<Vec<DamageDispute>> {
        let state = self.state.lock().await;
        let rows = state.disputes.values().cloned().collect();
        Ok(newest_first(rows, |d| d.created_at))
    }

    async fn add_reply(&self, reply: &DisputeReply) -> AppResult<bool> {
        let mut state = self.state.lock().await;
        match state.disputes.get_mut(&reply.dispute_id) {
            Some(dispute) => {
                dispute.replies.push(reply.clone());
                dispute.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn resolve_dispute(&self, id: DisputeId) -> AppResult<Option<DamageDispute>> {
        let mut state = self.state.lock().await;
        let Some(dispute) = state.disputes.get_mut(&id).filter(|d| d.status.is_open()) else {
            return Ok(None);
        };
        dispute.status = DisputeStatus::Resolved;
        dispute.updated_at = Utc::now();
        let resolved = dispute.clone();
        state.recompute_availability(resolved.vehicle_id);
        Ok(Some(resolved))
    }
}

#[async_trait]
impl ReviewStore for MemoryStore {
    async fn record_feedback(
        &self,
        booking_id: BookingId,
        customer: UserId,
        reviews: Vec<Review>,
    ) -> AppResult<FeedbackOutcome> {
        let mut state = self.state.lock().await;

        let duplicate = reviews.iter().any(|new| {
            state.reviews.iter().any(|r| {
                r.booking_id == new.booking_id
                    && r.reviewer_id == new.reviewer_id
                    && r.aspect == new.aspect
            })
        });
        let Some(booking) = state.bookings.get_mut(&booking_id).filter(|b| {
            b.customer_id == customer && b.status == BookingStatus::Completed && !b.feedback_given
        }) else {
            return Ok(FeedbackOutcome::AlreadyRecorded);
        };
        if duplicate {
            return Ok(FeedbackOutcome::AlreadyRecorded);
        }

        booking.feedback_given = true;
        booking.updated_at = Utc::now();
        state.reviews.extend(reviews.iter().cloned());
        Ok(FeedbackOutcome::Recorded(reviews))
    }

    async fn has_review(&self, booking_id: BookingId, reviewer: UserId) -> AppResult<bool> {
        let state = self.state.lock().await;
        Ok(state
            .reviews
            .iter()
            .any(|r| r.booking_id == booking_id && r.reviewer_id == reviewer))
    }

    async fn list_reviews_for_owner(&self, owner: UserId) -> AppResult<Vec<Review>> {
        let state = self.state.lock().await;
        let rows = state
            .reviews
            .iter()
            .filter(|r| {
                r.reviewee_id == owner
                    || state
                        .vehicles
                        .get(&r.vehicle_id)
                        .is_some_and(|v| v.owner_id == owner)
            })
            .cloned()
            .collect();
        Ok(newest_first(rows, |r| r.created_at))
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn insert_notification(&self, notification: &Notification) -> AppResult<()> {
        self.state
            .lock()
            .await
            .notifications
            .push(notification.clone());
        Ok(())
    }

    async fn list_notifications_for_user(&self, user: UserId) -> AppResult<Vec<Notification>> {
        let state = self.state.lock().await;
        let rows = state
            .notifications
            .iter()
            .filter(|n| n.user_id == user)
            .cloned()
            .collect();
        Ok(newest_first(rows, |n| n.created_at))
    }
}
