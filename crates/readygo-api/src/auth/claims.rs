//! JWT claims carried by every API token.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use readygo_core::error::AppError;
use readygo_core::result::AppResult;
use readygo_core::types::UserId;
use readygo_entity::user::UserRole;

/// JWT claims payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: UserId,
    /// Role at the time of issuance, e.g. `"owner"`.
    pub role: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Claims for `user` valid for `ttl` from now.
    pub fn new(user: UserId, role: UserRole, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user,
            role: role.as_str().to_ascii_lowercase(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }

    /// Parses the role claim.
    pub fn user_role(&self) -> AppResult<UserRole> {
        self.role
            .parse()
            .map_err(|_| AppError::authentication(format!("Unknown role in token: {}", self.role)))
    }
}
