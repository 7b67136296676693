//! Configuration module
//!
//! - `auth` - token signing and lifetime configuration

pub mod auth;

// Re-export commonly used types
pub use auth::{JwtConfig, DEFAULT_JWT_SECRET};
