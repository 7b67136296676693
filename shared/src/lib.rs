//! Shared configuration types for SessionKit
//!
//! This crate provides the configuration consumed by the token manager:
//! - JWT secret, signing algorithm and token lifetimes
//! - Environment-variable loading with development fallbacks

pub mod config;

// Re-export commonly used items at crate root
pub use config::{JwtConfig, DEFAULT_JWT_SECRET};
