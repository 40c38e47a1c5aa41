//! Request language extractor.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::{HeaderMap, request::Parts};

use personnel_domain::locale::Locale;
use personnel_domain::messages::Messages;

/// Language of the current request, resolved from `Accept-Language`.
///
/// Falls back to the default locale of the shared [`Messages`] table when the
/// header is absent or names an unsupported language. Never rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lang(pub Locale);

pub fn resolve_locale(headers: &HeaderMap, default: Locale) -> Locale {
    headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .and_then(Locale::from_accept_language)
        .unwrap_or(default)
}

impl<S> FromRequestParts<S> for Lang
where
    Arc<Messages>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    // Resolve synchronously and return a 'static future; see axum-core 0.5
    // `FromRequestParts` signature.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let messages = Arc::<Messages>::from_ref(state);
        let locale = resolve_locale(&parts.headers, messages.default_locale());
        async move { Ok(Self(locale)) }
    }
}
