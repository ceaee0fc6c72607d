//! Dashboard statistics for customers and owners.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use readygo_core::result::AppResult;
use readygo_database::store::{BookingStore, ReviewStore, Stores, VehicleStore};
use readygo_entity::booking::{Booking, BookingStatus};
use readygo_entity::review::Review;
use readygo_entity::user::UserRole;

use crate::context::RequestContext;

/// Booking counts shown on the customer dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerStats {
    /// Confirmed bookings not yet completed.
    pub upcoming: u64,
    /// Completed bookings.
    pub completed: u64,
}

impl CustomerStats {
    /// Counts `bookings` by status.
    pub fn from_bookings(bookings: &[Booking]) -> Self {
        Self {
            upcoming: bookings.iter().filter(|b| b.status.is_active()).count() as u64,
            completed: bookings
                .iter()
                .filter(|b| b.status == BookingStatus::Completed)
                .count() as u64,
        }
    }
}

/// Figures shown on the owner dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnerStats {
    /// Vehicles listed by the owner.
    pub total_vehicles: i64,
    /// Confirmed bookings not yet completed.
    pub active_bookings: u64,
    /// Sum of completed booking prices ending in the current month, capped at `i64::MAX`.
    pub monthly_earnings: i64,
    /// Mean rating across the owner and their vehicles; 0 without reviews.
    pub overall_rating: f64,
}

impl OwnerStats {
    /// Aggregates owner figures as of `today`.
    pub fn compute(
        total_vehicles: i64,
        bookings: &[Booking],
        reviews: &[Review],
        today: NaiveDate,
    ) -> Self {
        let active_bookings = bookings.iter().filter(|b| b.status.is_active()).count() as u64;
        let monthly_earnings = bookings
            .iter()
            .filter(|b| {
                b.status == BookingStatus::Completed
                    && b.end_date.year() == today.year()
                    && b.end_date.month() == today.month()
            })
            .fold(0i64, |acc, b| acc.saturating_add(b.total_price));
        let overall_rating = if reviews.is_empty() {
            0.0
        } else {
            reviews.iter().map(|r| f64::from(r.rating)).sum::<f64>() / reviews.len() as f64
        };

        Self {
            total_vehicles,
            active_bookings,
            monthly_earnings,
            overall_rating,
        }
    }
}

/// Read-only dashboard aggregates.
#[derive(Debug, Clone)]
pub struct StatsService {
    bookings: Arc<dyn BookingStore>,
    vehicles: Arc<dyn VehicleStore>,
    reviews: Arc<dyn ReviewStore>,
}

impl StatsService {
    /// Creates a new stats service.
    pub fn new(stores: &Stores) -> Self {
        Self {
            bookings: stores.bookings.clone(),
            vehicles: stores.vehicles.clone(),
            reviews: stores.reviews.clone(),
        }
    }

    /// Counts for the calling customer.
    pub async fn customer_stats(&self, ctx: &RequestContext) -> AppResult<CustomerStats> {
        ctx.require(UserRole::Customer)?;
        let bookings = self
            .bookings
            .list_bookings_for_customer(ctx.user_id)
            .await?;
        Ok(CustomerStats::from_bookings(&bookings))
    }

    /// Figures for the calling owner.
    pub async fn owner_stats(&self, ctx: &RequestContext) -> AppResult<OwnerStats> {
        ctx.require(UserRole::Owner)?;
        let total_vehicles = self.vehicles.count_vehicles_for_owner(ctx.user_id).await?;
        let bookings = self.bookings.list_bookings_for_owner(ctx.user_id).await?;
        let reviews = self.reviews.list_reviews_for_owner(ctx.user_id).await?;
        Ok(OwnerStats::compute(
            total_vehicles,
            &bookings,
            &reviews,
            ctx.today(),
        ))
    }
}
