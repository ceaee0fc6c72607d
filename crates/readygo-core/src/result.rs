//! Convenience result type alias for ReadyGo.

use crate::error::AppError;

/// A specialized `Result` type for ReadyGo operations.
pub type AppResult<T> = Result<T, AppError>;
