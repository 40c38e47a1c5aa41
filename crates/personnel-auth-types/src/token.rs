//! Access and refresh JWT issuance and validation.
//!
//! Two independent token classes, each with its own HMAC secret and lifetime.
//! The manager holds no state beyond its keys; build it once at startup and
//! share it read-only.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discriminates access from refresh tokens inside the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims of a short-lived access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub user_id: i64,
    pub role: String,
    pub typ: TokenKind,
    pub exp: i64,
    pub iat: i64,
    pub nbf: i64,
}

/// Claims of a refresh token. The signed string doubles as the session key, so
/// `jti` keeps two tokens issued to one user within the same second distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub user_id: i64,
    pub typ: TokenKind,
    pub jti: String,
    pub exp: i64,
    pub iat: i64,
    pub nbf: i64,
}

/// Errors returned by [`TokenManager`].
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("malformed token")]
    Malformed,
    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

impl TokenError {
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired)
    }
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Keys {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Issues and verifies access and refresh tokens.
pub struct TokenManager {
    access: Keys,
    refresh: Keys,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenManager {
    pub fn new(
        access_secret: &str,
        refresh_secret: &str,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            access: Keys::from_secret(access_secret),
            refresh: Keys::from_secret(refresh_secret),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn access_token_duration(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_token_duration(&self) -> Duration {
        self.refresh_ttl
    }

    /// Sign an access token for `user_id` with `role`. Returns the token and its expiry.
    pub fn generate_access_token(
        &self,
        user_id: i64,
        role: &str,
    ) -> Result<(String, DateTime<Utc>), TokenError> {
        let now = Utc::now();
        let expires_at = now + self.access_ttl;
        let claims = AccessClaims {
            user_id,
            role: role.to_owned(),
            typ: TokenKind::Access,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
        };
        let token = encode(&Header::default(), &claims, &self.access.encoding)
            .map_err(TokenError::Signing)?;
        Ok((token, expires_at))
    }

    /// Sign a refresh token for `user_id` with the refresh secret.
    pub fn generate_refresh_token(
        &self,
        user_id: i64,
    ) -> Result<(String, DateTime<Utc>), TokenError> {
        let now = Utc::now();
        let expires_at = now + self.refresh_ttl;
        let claims = RefreshClaims {
            user_id,
            typ: TokenKind::Refresh,
            jti: Uuid::new_v4().simple().to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
        };
        let token = encode(&Header::default(), &claims, &self.refresh.encoding)
            .map_err(TokenError::Signing)?;
        Ok((token, expires_at))
    }

    pub fn validate_access_token(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let claims: AccessClaims = decode_token(token, &self.access.decoding)?;
        if claims.typ != TokenKind::Access {
            return Err(TokenError::Malformed);
        }
        Ok(claims)
    }

    pub fn validate_refresh_token(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        let claims: RefreshClaims = decode_token(token, &self.refresh.decoding)?;
        if claims.typ != TokenKind::Refresh {
            return Err(TokenError::Malformed);
        }
        Ok(claims)
    }
}

/// Decode and validate a JWT.
///
/// Only the HMAC family is accepted, so `none` and asymmetric algorithm
/// substitution fail before any signature check. `exp` and `nbf` are required
/// and checked without leeway: tokens are issued and verified by the same process.
fn decode_token<T: DeserializeOwned>(token: &str, key: &DecodingKey) -> Result<T, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
    validation.leeway = 0;
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.set_required_spec_claims(&["exp", "nbf"]);

    decode::<T>(token, key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            JwtErrorKind::ExpiredSignature => TokenError::Expired,
            JwtErrorKind::InvalidSignature
            | JwtErrorKind::InvalidAlgorithm
            | JwtErrorKind::InvalidAlgorithmName
            | JwtErrorKind::ImmatureSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        })
}
