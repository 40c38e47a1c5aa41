use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::response::{IntoResponse, Response};

use personnel_auth_types::token::TokenError;
use personnel_core::error::{ApiError, ErrorKind};

/// Registry service error variants.
///
/// `BadRequest` carries a client-safe message already rendered in the request
/// language. Every other variant is answered with the localized status-level
/// message by the error middleware.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("{0}")]
    BadRequest(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found")]
    NotFound,
    /// Unique-constraint conflict reported by a repository. Usecases that can
    /// recover (unique id retry, duplicate email) match on it; anywhere else it
    /// is unclassified.
    #[error("record already exists")]
    AlreadyExists,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadRequest(_) => ErrorKind::BadRequest,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::NotFound => ErrorKind::NotFound,
            Self::AlreadyExists => ErrorKind::Unknown,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<TokenError> for RegistryError {
    fn from(e: TokenError) -> Self {
        match e {
            TokenError::Signing(source) => {
                Self::Internal(anyhow::Error::new(source).context("sign token"))
            }
            TokenError::Expired | TokenError::InvalidSignature | TokenError::Malformed => {
                Self::Unauthorized
            }
        }
    }
}

impl From<JsonRejection> for RegistryError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for RegistryError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        // 4xx are expected client errors and already visible in the TraceLayer span.
        match &self {
            Self::Internal(e) => {
                tracing::error!(error = format!("{e:#}"), kind = "INTERNAL", "internal error");
            }
            Self::AlreadyExists => {
                tracing::error!(kind = "UNKNOWN", "unhandled unique constraint conflict");
            }
            _ => {}
        }
        ApiError::new(self.kind(), self.to_string()).into_response()
    }
}
