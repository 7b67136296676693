//! Token module for JWT management
//!
//! This module handles all token-related operations:
//! - Signed access token generation and verification
//! - Opaque refresh token generation
//! - HMAC algorithm selection

mod algorithm;
mod manager;


pub use algorithm::SigningAlgorithm;
pub use manager::TokenManager;
