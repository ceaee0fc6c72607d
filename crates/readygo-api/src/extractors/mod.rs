//! Custom Axum extractors.

pub mod auth;
pub mod json;
pub mod multipart;
pub mod path;

pub use auth::AuthUser;
pub use json::ValidatedJson;
pub use multipart::EvidenceForm;
pub use path::parse_id;
