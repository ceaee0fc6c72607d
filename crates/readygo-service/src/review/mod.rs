//! Customer feedback.

pub mod service;

pub use service::{FeedbackRequest, ReviewService};
