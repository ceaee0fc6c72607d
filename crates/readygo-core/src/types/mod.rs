//! Core type definitions used across the ReadyGo workspace.

pub mod id;

pub use id::*;
