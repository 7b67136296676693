//! # SessionKit Core
//!
//! Issues and validates signed access tokens and mints opaque refresh
//! tokens. The [`TokenManager`] is an explicitly constructed, immutable
//! value; share it by reference or `Arc` with whatever needs to issue or
//! verify tokens.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{Claims, RefreshToken, TokenPair, REFRESH_TOKEN_BYTES};
pub use errors::{TokenError, TokenResult};
pub use services::{SigningAlgorithm, TokenManager};
