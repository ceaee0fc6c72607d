//! # readygo-service
//!
//! Business logic for the ReadyGo rental core. Each service orchestrates
//! the stores, the evidence uploader and the notifier to implement one
//! group of use cases.
//!
//! Services follow constructor injection: all dependencies are provided at
//! construction time via `Arc` references, and caller identity arrives
//! explicitly as a [`RequestContext`] on every call.

pub mod booking;
pub mod context;
pub mod dispute;
pub mod media;
pub mod notification;
pub mod review;

pub use booking::{BookingService, StatsService};
pub use context::RequestContext;
pub use dispute::DisputeService;
pub use media::{EvidenceUpload, EvidenceUploader};
pub use notification::Notifier;
pub use review::ReviewService;
