//! Bearer access-token extractor for protected routes.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use http::request::Parts;

use personnel_core::error::ApiError;

use crate::token::TokenManager;

/// Identity of the caller, taken from a valid `Authorization: Bearer <access token>`.
///
/// Rejects with 401 when the header is missing, is not a bearer credential, or
/// carries a token that fails validation (including expired and refresh tokens).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerIdentity {
    pub user_id: i64,
    pub role: String,
}

impl<S> FromRequestParts<S> for BearerIdentity
where
    Arc<TokenManager>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let tokens = Arc::<TokenManager>::from_ref(state);
        let result = match parts.headers.typed_get::<Authorization<Bearer>>() {
            None => Err(ApiError::unauthorized()),
            Some(Authorization(bearer)) => tokens
                .validate_access_token(bearer.token())
                .map(|claims| Self {
                    user_id: claims.user_id,
                    role: claims.role,
                })
                .map_err(|e| {
                    tracing::debug!(error = %e, "rejected access token");
                    ApiError::unauthorized()
                }),
        };
        async move { result }
    }
}
