use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use personnel_domain::messages::MessageKey;

/// Error classes exposed to clients.
///
/// Every error response carries its kind in the response extensions so
/// [`crate::middleware::localize_errors`] can replace the message with the
/// localized text for the request language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    NotFound,
    Internal,
    Unknown,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            // Non-standard "web server returned an unknown error".
            Self::Unknown => {
                StatusCode::from_u16(520).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::NotFound => "NOT_FOUND",
            Self::Internal => "INTERNAL",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Status-level message used for every kind except `BadRequest`.
    pub fn message_key(self) -> MessageKey {
        match self {
            Self::BadRequest => MessageKey::BadRequest,
            Self::Unauthorized => MessageKey::Unauthorized,
            Self::NotFound => MessageKey::NotFound,
            Self::Internal => MessageKey::InternalServerError,
            Self::Unknown => MessageKey::UnknownError,
        }
    }

    /// Whether the error message is client-safe detail (kept as is) rather
    /// than a placeholder to be replaced by the status-level message.
    pub fn keeps_message(self) -> bool {
        matches!(self, Self::BadRequest)
    }
}

/// Client-facing error envelope: `{ "kind": "...", "message": "..." }`.
///
/// Services convert their own error enums into this at the transport boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(ErrorKind::Unauthorized, "unauthorized")
    }

    pub fn internal() -> Self {
        Self::new(ErrorKind::Internal, "internal error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "kind": self.kind.code(),
            "message": self.message,
        });
        let mut response = (self.kind.status(), axum::Json(body)).into_response();
        response.extensions_mut().insert(self.kind);
        response
    }
}
