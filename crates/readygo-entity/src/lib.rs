//! # readygo-entity
//!
//! Domain entity models for the ReadyGo rental core. Every struct in this
//! crate represents a database table row or a domain value object. Database
//! entities derive `sqlx::FromRow`.

pub mod booking;
pub mod dispute;
pub mod notification;
pub mod review;
pub mod user;
pub mod vehicle;
