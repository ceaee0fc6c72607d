//! # readygo-core
//!
//! Core crate for the ReadyGo rental platform. Contains the media store
//! trait, configuration schemas, typed identifiers, and the unified error
//! system.
//!
//! This crate has **no** internal dependencies on other ReadyGo crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
