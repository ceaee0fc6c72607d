//! Request context carrying the authenticated caller.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use readygo_core::error::AppError;
use readygo_core::result::AppResult;
use readygo_core::types::UserId;
use readygo_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Built by the API layer from the bearer token and passed into every
/// service method so that each operation knows who is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// The user's role at the time the token was issued.
    pub role: UserRole,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context stamped with the current time.
    pub fn new(user_id: UserId, role: UserRole) -> Self {
        Self {
            user_id,
            role,
            request_time: Utc::now(),
        }
    }

    /// Replaces the request time.
    pub fn at(mut self, request_time: DateTime<Utc>) -> Self {
        self.request_time = request_time;
        self
    }

    /// Calendar date of the request (UTC).
    pub fn today(&self) -> NaiveDate {
        self.request_time.date_naive()
    }

    /// Fails with an authorization error unless the caller has `role`.
    pub fn require(&self, role: UserRole) -> AppResult<()> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "Access denied. {role} role required."
            )))
        }
    }
}
