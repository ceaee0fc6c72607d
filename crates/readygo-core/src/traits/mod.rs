//! Core traits defined in `readygo-core` and implemented by other crates.

pub mod media;

pub use media::{MediaStore, StoredMedia};
