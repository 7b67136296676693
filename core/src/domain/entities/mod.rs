//! Domain entities representing issued tokens.

pub mod token;

// Re-export commonly used types
pub use token::{Claims, RefreshToken, TokenPair, REFRESH_TOKEN_BYTES};
