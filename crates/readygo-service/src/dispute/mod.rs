//! Damage disputes.

pub mod service;

pub use service::DisputeService;
