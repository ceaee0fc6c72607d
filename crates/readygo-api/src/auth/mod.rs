//! Bearer token verification.

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{JwtDecoder, JwtEncoder};
