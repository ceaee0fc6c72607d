//! Typed path parameter helpers.

use std::str::FromStr;

use readygo_core::error::AppError;
use readygo_core::result::AppResult;

/// Parses an identifier from a path segment.
pub fn parse_id<T: FromStr>(s: &str) -> AppResult<T> {
    s.parse()
        .map_err(|_| AppError::validation(format!("Invalid id: {s}")))
}
