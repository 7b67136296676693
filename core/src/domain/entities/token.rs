//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Number of random bytes behind a refresh token identifier (128 bits)
pub const REFRESH_TOKEN_BYTES: usize = 16;

/// Claims structure for the access token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Identifier of the authenticated user
    pub user_id: String,

    /// Caller-defined role label
    pub user_role: String,

    /// Expiration timestamp (seconds since the Unix epoch)
    pub exp: i64,

    /// Issued at timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// JWT ID (unique identifier for the token)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    /// Creates claims for an access token issued at `issued_at`
    ///
    /// # Arguments
    ///
    /// * `user_id` - The user's identifier
    /// * `user_role` - The user's role label
    /// * `issued_at` - Issuance time
    /// * `expires_at` - Expiration time
    pub fn new(
        user_id: impl Into<String>,
        user_role: impl Into<String>,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            user_role: user_role.into(),
            exp: expires_at.timestamp(),
            iat: Some(issued_at.timestamp()),
            jti: Some(Uuid::new_v4().to_string()),
        }
    }

    /// Expiration as a timestamp, `None` if `exp` is out of range
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }

    /// A token is expired once `now` reaches `exp`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Opaque refresh token handed to the client
///
/// Carries no decodable content. The association between `id` and a user
/// belongs in the caller's session store, keyed by [`RefreshToken::storage_hash`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Random hex-encoded identifier
    pub id: String,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Wraps an identifier and its expiry
    pub fn new(id: String, expires_at: DateTime<Utc>) -> Self {
        Self { id, expires_at }
    }

    /// Checks if the refresh token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Gets the time remaining until expiration, or zero if expired
    pub fn time_until_expiration(&self) -> Duration {
        let now = Utc::now();
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }

    /// SHA-256 hex digest of the identifier, the form a store should persist
    pub fn storage_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.id.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Signed access token
    pub access_token: String,

    /// Opaque refresh token identifier
    pub refresh_token: String,

    /// When the refresh token stops being accepted
    pub refresh_expires_at: DateTime<Utc>,

    /// Access token lifetime in seconds
    pub access_expires_in: i64,

    /// Refresh token lifetime in seconds
    pub refresh_expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_claims() {
        let now = Utc::now();
        let claims = Claims::new("u1", "admin", now, now + Duration::minutes(15));

        assert_eq!(claims.user_id, "u1");
        assert_eq!(claims.user_role, "admin");
        assert_eq!(claims.iat, Some(now.timestamp()));
        assert_eq!(claims.exp, (now + Duration::minutes(15)).timestamp());
        assert!(claims.jti.is_some());
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_claims_get_distinct_jti() {
        let now = Utc::now();
        let a = Claims::new("u1", "admin", now, now + Duration::minutes(1));
        let b = Claims::new("u1", "admin", now, now + Duration::minutes(1));

        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_claims_expire_at_exp() {
        let now = Utc::now();
        let claims = Claims::new("u1", "user", now, now);

        assert!(claims.is_expired_at(now));
        assert!(!claims.is_expired_at(now - Duration::seconds(1)));
    }

    #[test]
    fn test_claims_expires_at_out_of_range() {
        let now = Utc::now();
        let mut claims = Claims::new("u1", "user", now, now);
        claims.exp = i64::MAX;

        assert!(claims.expires_at().is_none());
    }

    #[test]
    fn test_claims_without_optional_fields_deserialize() {
        let json = r#"{"user_id":"u1","user_role":"admin","exp":4102444800}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();

        assert_eq!(claims.user_id, "u1");
        assert_eq!(claims.iat, None);
        assert_eq!(claims.jti, None);
        assert_eq!(claims.expires_at().unwrap().timestamp(), 4102444800);
    }

    #[test]
    fn test_refresh_token_expiration() {
        let token = RefreshToken::new("abc".to_string(), Utc::now() - Duration::days(1));

        assert!(token.is_expired());
        assert_eq!(token.time_until_expiration(), Duration::zero());
    }

    #[test]
    fn test_refresh_token_time_until_expiration() {
        let token = RefreshToken::new("abc".to_string(), Utc::now() + Duration::days(7));

        let remaining = token.time_until_expiration();
        assert!(remaining <= Duration::days(7));
        assert!(remaining > Duration::days(6));
        assert!(!token.is_expired());
    }

    #[test]
    fn test_refresh_token_storage_hash() {
        let token = RefreshToken::new("abc".to_string(), Utc::now());

        // SHA-256("abc")
        assert_eq!(
            token.storage_hash(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
