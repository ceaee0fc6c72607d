//! PostgreSQL implementations of the store traits.

pub mod availability;
pub mod booking;
pub mod dispute;
pub mod notification;
pub mod review;
pub mod vehicle;

pub use booking::BookingRepository;
pub use dispute::DisputeRepository;
pub use notification::NotificationRepository;
pub use review::ReviewRepository;
pub use vehicle::VehicleRepository;

use readygo_core::error::{AppError, ErrorKind};

/// Wrap a sqlx error with a short description of the failed step.
pub(crate) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, context, e)
}
