//! Damage dispute entities.

pub mod model;
pub mod status;

pub use model::{DamageDispute, DisputeReply, NewDispute};
pub use status::DisputeStatus;
