//! User-facing role definitions.

pub mod role;

pub use role::UserRole;
