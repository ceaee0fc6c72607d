//! Dispute review status.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Arbitration status of a damage dispute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "dispute_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DisputeStatus {
    /// Awaiting an administrator decision; locks the vehicle.
    PendingReview,
    /// Closed by an administrator.
    Resolved,
}

impl DisputeStatus {
    /// Whether the dispute still locks its vehicle.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::PendingReview)
    }

    /// Return the status as its stored string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingReview => "pending_review",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for DisputeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
