//! Token manager implementation

use std::fmt;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::Deserialize;
use sk_shared::JwtConfig;

use crate::domain::entities::token::{Claims, RefreshToken, TokenPair, REFRESH_TOKEN_BYTES};
use crate::errors::{TokenError, TokenResult};

use super::algorithm::SigningAlgorithm;

/// Why a presented token was rejected
///
/// Only surfaces in debug logs; callers see [`TokenError::InvalidToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenRejection {
    Malformed,
    SignatureMismatch,
    WrongAlgorithm,
    Expired,
}

impl TokenRejection {
    fn as_str(&self) -> &'static str {
        match self {
            TokenRejection::Malformed => "malformed",
            TokenRejection::SignatureMismatch => "signature_mismatch",
            TokenRejection::WrongAlgorithm => "wrong_algorithm",
            TokenRejection::Expired => "expired",
        }
    }
}

#[derive(Deserialize)]
struct HeaderProbe {
    alg: Option<String>,
}

/// Issues and validates signed access tokens and mints opaque refresh tokens
///
/// Configuration is fixed at construction. Every operation takes `&self`,
/// so one instance can be shared across threads behind an `Arc`.
#[derive(Clone)]
pub struct TokenManager {
    algorithm: SigningAlgorithm,
    access_ttl: Duration,
    refresh_ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenManager")
            .field("algorithm", &self.algorithm)
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    /// Creates a manager signing with HS256
    ///
    /// # Arguments
    ///
    /// * `secret` - Symmetric signing secret, must not be empty
    /// * `access_ttl` - Lifetime of access tokens
    /// * `refresh_ttl` - Lifetime of refresh tokens
    ///
    /// # Returns
    ///
    /// * `Ok(TokenManager)` - Manager ready to issue tokens
    /// * `Err(TokenError::Construction)` - The secret is empty or a lifetime
    ///   pushes expiry past the representable date range
    pub fn new(
        secret: impl AsRef<[u8]>,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> TokenResult<Self> {
        Self::with_algorithm(secret, SigningAlgorithm::default(), access_ttl, refresh_ttl)
    }

    /// Creates a manager signing and verifying with `algorithm` only
    pub fn with_algorithm(
        secret: impl AsRef<[u8]>,
        algorithm: SigningAlgorithm,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> TokenResult<Self> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(TokenError::Construction {
                message: "secret must not be empty".to_string(),
            });
        }

        let now = Utc::now();
        expiry_after(now, access_ttl, "access")?;
        expiry_after(now, refresh_ttl, "refresh")?;

        let mut validation = Validation::new(algorithm.jwt_algorithm());
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            algorithm,
            access_ttl,
            refresh_ttl,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }

    /// Creates a manager from the shared JWT configuration
    ///
    /// Fails with `TokenError::Construction` on an empty secret, an
    /// out-of-range expiry or an algorithm outside HS256/HS384/HS512.
    pub fn from_config(config: &JwtConfig) -> TokenResult<Self> {
        let algorithm: SigningAlgorithm = config.algorithm.parse()?;
        let access_ttl = config.access_ttl().ok_or_else(|| out_of_range("access"))?;
        let refresh_ttl = config.refresh_ttl().ok_or_else(|| out_of_range("refresh"))?;

        if config.is_using_default_secret() {
            tracing::warn!(
                event = "default_jwt_secret",
                "Token manager is using the development JWT secret; set JWT_SECRET"
            );
        }

        Self::with_algorithm(
            config.secret.as_bytes(),
            algorithm,
            access_ttl,
            refresh_ttl,
        )
    }

    /// Algorithm used for signing and the only one accepted on parse
    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    /// Lifetime of issued access tokens
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Lifetime of issued refresh tokens
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Generates a signed access token for a user
    ///
    /// # Arguments
    ///
    /// * `user_id` - Non-empty user identifier
    /// * `role` - Caller-defined role label
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Compact `header.payload.signature` token
    /// * `Err(TokenError::InvalidInput)` - `user_id` is empty
    /// * `Err(TokenError::Signing)` - Encoding failed
    pub fn generate_access_token(&self, user_id: &str, role: &str) -> TokenResult<String> {
        ensure_user_id(user_id)?;

        let issued_at = Utc::now();
        let expires_at = expiry_after(issued_at, self.access_ttl, "access")?;
        let claims = Claims::new(user_id, role, issued_at, expires_at);

        let header = Header::new(self.algorithm.jwt_algorithm());
        let token = encode(&header, &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(
                error = %e,
                event = "access_token_signing_failed",
                "Failed to sign access token"
            );
            TokenError::Signing
        })?;

        tracing::debug!(
            user_id = user_id,
            algorithm = %self.algorithm,
            expires_at = claims.exp,
            event = "access_token_issued",
            "Issued access token"
        );

        Ok(token)
    }

    /// Verifies an access token and returns its claims
    ///
    /// # Arguments
    ///
    /// * `token` - Token string presented by a client
    ///
    /// # Returns
    ///
    /// * `Ok(Claims)` - Signature verified and token not expired
    /// * `Err(TokenError::InvalidToken)` - Anything else
    pub fn parse_access_token(&self, token: &str) -> TokenResult<Claims> {
        self.validate(token, Utc::now()).map_err(|reason| {
            tracing::debug!(
                reason = reason.as_str(),
                event = "access_token_rejected",
                "Rejected access token"
            );
            TokenError::InvalidToken
        })
    }

    /// Generates an opaque refresh token
    ///
    /// The identifier embeds neither `user_id` nor `role`; persisting the
    /// association is up to the caller's session store.
    ///
    /// # Returns
    ///
    /// * `Ok(RefreshToken)` - Random identifier and its expiry
    /// * `Err(TokenError::InvalidInput)` - `user_id` is empty
    pub fn generate_refresh_token(&self, user_id: &str, _role: &str) -> TokenResult<RefreshToken> {
        ensure_user_id(user_id)?;

        let expires_at = expiry_after(Utc::now(), self.refresh_ttl, "refresh")?;

        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);

        tracing::debug!(
            user_id = user_id,
            expires_at = %expires_at,
            event = "refresh_token_issued",
            "Issued refresh token"
        );

        Ok(RefreshToken::new(hex::encode(bytes), expires_at))
    }

    /// Generates an access token and a refresh token for the same user
    pub fn generate_token_pair(&self, user_id: &str, role: &str) -> TokenResult<TokenPair> {
        let access_token = self.generate_access_token(user_id, role)?;
        let refresh = self.generate_refresh_token(user_id, role)?;

        Ok(TokenPair {
            access_token,
            refresh_token: refresh.id,
            refresh_expires_at: refresh.expires_at,
            access_expires_in: self.access_ttl.num_seconds(),
            refresh_expires_in: self.refresh_ttl.num_seconds(),
        })
    }

    /// Full validation against an explicit `now`
    pub(crate) fn validate(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Claims, TokenRejection> {
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 {
            return Err(TokenRejection::Malformed);
        }

        let header = probe_header(segments[0])?;
        if header.alg.as_deref() != Some(self.algorithm.as_str()) {
            return Err(TokenRejection::WrongAlgorithm);
        }

        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| classify(e.kind()))?
            .claims;

        if claims.expires_at().is_none() {
            return Err(TokenRejection::Malformed);
        }
        if claims.is_expired_at(now) {
            return Err(TokenRejection::Expired);
        }

        Ok(claims)
    }
}

fn ensure_user_id(user_id: &str) -> TokenResult<()> {
    if user_id.is_empty() {
        return Err(TokenError::InvalidInput {
            field: "user_id".to_string(),
        });
    }
    Ok(())
}

fn out_of_range(kind: &str) -> TokenError {
    TokenError::Construction {
        message: format!("{} token expiry out of range", kind),
    }
}

fn expiry_after(now: DateTime<Utc>, ttl: Duration, kind: &str) -> TokenResult<DateTime<Utc>> {
    now.checked_add_signed(ttl).ok_or_else(|| out_of_range(kind))
}

/// Reads `alg` without `jsonwebtoken::decode_header`, which fails on `none`
/// and would make it indistinguishable from a malformed header.
fn probe_header(segment: &str) -> Result<HeaderProbe, TokenRejection> {
    let raw = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| TokenRejection::Malformed)?;
    serde_json::from_slice(&raw).map_err(|_| TokenRejection::Malformed)
}

fn classify(kind: &ErrorKind) -> TokenRejection {
    match kind {
        ErrorKind::InvalidSignature => TokenRejection::SignatureMismatch,
        ErrorKind::ExpiredSignature => TokenRejection::Expired,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            TokenRejection::WrongAlgorithm
        }
        _ => TokenRejection::Malformed,
    }
}
