//! Token manager error types.

use thiserror::Error;

/// Errors returned by the token manager
///
/// `InvalidToken` is deliberately coarse: callers should treat it as
/// "reject and require re-authentication" and never branch on why.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid token manager configuration: {message}")]
    Construction { message: String },

    #[error("Token generation failed")]
    Signing,

    #[error("Invalid input: {field} must not be empty")]
    InvalidInput { field: String },

    #[error("Invalid or expired token")]
    InvalidToken,
}

pub type TokenResult<T> = Result<T, TokenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_token_message_is_coarse() {
        assert_eq!(TokenError::InvalidToken.to_string(), "Invalid or expired token");
    }

    #[test]
    fn test_construction_message_includes_reason() {
        let err = TokenError::Construction {
            message: "secret must not be empty".to_string(),
        };
        assert!(err.to_string().contains("secret must not be empty"));
    }
}
