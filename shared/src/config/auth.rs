//! Authentication token configuration

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Secret used when `JWT_SECRET` is not set. Never deploy with it.
pub const DEFAULT_JWT_SECRET: &str = "development-secret-please-change-in-production";

const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 900; // 15 minutes
const DEFAULT_REFRESH_TOKEN_EXPIRY: i64 = 604800; // 7 days

/// JWT authentication configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Symmetric secret used to sign access tokens
    pub secret: String,

    /// Access token expiry time in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiry time in seconds
    pub refresh_token_expiry: i64,

    /// HMAC algorithm name (HS256, HS384 or HS512)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_JWT_SECRET.to_string(),
            access_token_expiry: DEFAULT_ACCESS_TOKEN_EXPIRY,
            refresh_token_expiry: DEFAULT_REFRESH_TOKEN_EXPIRY,
            algorithm: default_algorithm(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Create from environment variables
    ///
    /// Reads `JWT_SECRET`, `JWT_ACCESS_TOKEN_EXPIRY`, `JWT_REFRESH_TOKEN_EXPIRY`
    /// (both in seconds) and `JWT_ALGORITHM`. Missing or unparsable values fall
    /// back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from an arbitrary key lookup (environment, secrets store, test map)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET").unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string());
        let access_token_expiry = lookup("JWT_ACCESS_TOKEN_EXPIRY")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_ACCESS_TOKEN_EXPIRY);
        let refresh_token_expiry = lookup("JWT_REFRESH_TOKEN_EXPIRY")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_REFRESH_TOKEN_EXPIRY);
        let algorithm = lookup("JWT_ALGORITHM").unwrap_or_else(default_algorithm);

        Self {
            secret,
            access_token_expiry,
            refresh_token_expiry,
            algorithm,
        }
    }

    /// Set access token expiry in minutes
    ///
    /// Overflowing values saturate and are rejected by [`JwtConfig::access_ttl`].
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes.saturating_mul(60);
        self
    }

    /// Set refresh token expiry in days
    ///
    /// Overflowing values saturate and are rejected by [`JwtConfig::refresh_ttl`].
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days.saturating_mul(86400);
        self
    }

    /// Set the signing algorithm name
    pub fn with_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = algorithm.into();
        self
    }

    /// Access token lifetime, `None` if the expiry is out of range
    pub fn access_ttl(&self) -> Option<Duration> {
        Duration::try_seconds(self.access_token_expiry)
    }

    /// Refresh token lifetime, `None` if the expiry is out of range
    pub fn refresh_ttl(&self) -> Option<Duration> {
        Duration::try_seconds(self.refresh_token_expiry)
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_JWT_SECRET
    }
}

fn default_algorithm() -> String {
    String::from("HS256")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_jwt_config_default() {
        let config = JwtConfig::default();
        assert_eq!(config.access_token_expiry, 900);
        assert_eq!(config.refresh_token_expiry, 604800);
        assert_eq!(config.algorithm, "HS256");
        assert!(config.is_using_default_secret());
    }

    #[test]
    fn test_jwt_config_builder() {
        let config = JwtConfig::new("my-secret")
            .with_access_expiry_minutes(30)
            .with_refresh_expiry_days(14)
            .with_algorithm("HS512");

        assert_eq!(config.access_token_expiry, 1800);
        assert_eq!(config.refresh_token_expiry, 1209600);
        assert_eq!(config.algorithm, "HS512");
        assert_eq!(config.access_ttl(), Some(Duration::minutes(30)));
        assert_eq!(config.refresh_ttl(), Some(Duration::days(14)));
        assert!(!config.is_using_default_secret());
    }

    #[test]
    fn test_from_lookup_reads_all_keys() {
        let config = JwtConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("JWT_ACCESS_TOKEN_EXPIRY", "60"),
            ("JWT_REFRESH_TOKEN_EXPIRY", " 3600 "),
            ("JWT_ALGORITHM", "HS384"),
        ]));

        assert_eq!(config.secret, "s3cret");
        assert_eq!(config.access_token_expiry, 60);
        assert_eq!(config.refresh_token_expiry, 3600);
        assert_eq!(config.algorithm, "HS384");
    }

    #[test]
    fn test_from_lookup_falls_back_on_missing_or_bad_values() {
        let config = JwtConfig::from_lookup(lookup_from(&[
            ("JWT_ACCESS_TOKEN_EXPIRY", "fifteen minutes"),
        ]));

        assert_eq!(config, JwtConfig::default());
    }

    #[test]
    fn test_algorithm_defaults_when_absent_from_serialized_form() {
        let json = r#"{"secret":"abc","access_token_expiry":10,"refresh_token_expiry":20}"#;
        let config: JwtConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.algorithm, "HS256");
        assert_eq!(config.access_ttl(), Some(Duration::seconds(10)));
    }

    #[test]
    fn test_out_of_range_expiry_has_no_ttl() {
        let config = JwtConfig::from_lookup(lookup_from(&[
            ("JWT_ACCESS_TOKEN_EXPIRY", "9223372036854775807"),
            ("JWT_REFRESH_TOKEN_EXPIRY", "-9223372036854775808"),
        ]));

        assert_eq!(config.access_token_expiry, i64::MAX);
        assert_eq!(config.access_ttl(), None);
        assert_eq!(config.refresh_ttl(), None);
    }

    #[test]
    fn test_builder_overflow_saturates_instead_of_panicking() {
        let config = JwtConfig::new("my-secret")
            .with_access_expiry_minutes(i64::MAX)
            .with_refresh_expiry_days(i64::MIN);

        assert_eq!(config.access_token_expiry, i64::MAX);
        assert_eq!(config.refresh_token_expiry, i64::MIN);
        assert_eq!(config.access_ttl(), None);
        assert_eq!(config.refresh_ttl(), None);
    }
}
