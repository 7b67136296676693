//! Services containing token issuance and validation logic.

pub mod token;

// Re-export commonly used types
pub use token::{SigningAlgorithm, TokenManager};
