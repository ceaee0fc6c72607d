//! Notification emission.

pub mod emitter;

pub use emitter::Notifier;
