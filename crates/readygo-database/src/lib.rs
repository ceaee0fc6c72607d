//! # readygo-database
//!
//! Persistence for the ReadyGo rental core: the store traits the service
//! layer depends on, PostgreSQL repositories implementing them, and an
//! in-memory store with identical compare-and-swap semantics.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::{
    BookingStore, BookingTransition, DisputeStore, FeedbackOutcome, NotificationStore,
    ReviewStore, Stores, TransitionOutcome, VehicleStore,
};
