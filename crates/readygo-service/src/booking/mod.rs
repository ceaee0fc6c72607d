//! Booking lifecycle and booking statistics.

pub mod pricing;
pub mod service;
pub mod stats;

pub use service::{BookingService, CreateBookingRequest};
pub use stats::{CustomerStats, OwnerStats, StatsService};
