//! # readygo-api
//!
//! HTTP API layer for ReadyGo built on Axum.
//!
//! Decodes bearer tokens into a [`RequestContext`](readygo_service::RequestContext),
//! hands it to the services, and maps [`AppError`](readygo_core::AppError)
//! onto status codes.

pub mod auth;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
