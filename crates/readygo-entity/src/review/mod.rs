//! Review entities.

pub mod model;

pub use model::{Feedback, Review, ReviewAspect};
