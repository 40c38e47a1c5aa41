use std::any::Any;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::HeaderName;
use axum::http::header::CONTENT_LENGTH;
use axum::middleware::{Next, from_fn_with_state};
use axum::response::{IntoResponse, Response};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::{MakeSpan, TraceLayer};
use uuid::Uuid;

use personnel_domain::messages::Messages;

use crate::error::{ApiError, ErrorKind};
use crate::locale::resolve_locale;

pub const X_REQUEST_ID: &str = "x-request-id";

#[derive(Clone, Default)]
pub struct MakeUuidRequestId;

impl MakeRequestId for MakeUuidRequestId {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        id.parse().ok().map(RequestId::new)
    }
}

/// Build the request-id layer. Keeps an inbound `x-request-id`, otherwise assigns a UUID.
pub fn request_id_layer() -> SetRequestIdLayer<MakeUuidRequestId> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), MakeUuidRequestId)
}

/// Copy the request id onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID))
}

/// Request span carrying method, uri and the correlation id, so every event
/// logged while handling the request (including internal error causes) can be
/// matched to it.
#[derive(Clone, Copy, Default)]
pub struct RequestIdSpan;

impl<B> MakeSpan<B> for RequestIdSpan {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> tracing::Span {
        let request_id = request
            .headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");
        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id,
        )
    }
}

pub fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestIdSpan> {
    TraceLayer::new_for_http().make_span_with(RequestIdSpan)
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    tracing::error!(panic = detail, kind = "INTERNAL", "handler panicked");
    ApiError::internal().into_response()
}

/// Convert panics in handlers into the generic 500 envelope.
pub fn catch_panic_layer() -> CatchPanicLayer<fn(Box<dyn Any + Send + 'static>) -> Response> {
    CatchPanicLayer::custom(panic_response as fn(Box<dyn Any + Send + 'static>) -> Response)
}

/// Replace the message of non-400 error responses with the localized
/// status-level message for the request language. 400 messages are already
/// client-safe and localized by the usecase that produced them.
pub async fn localize_errors(
    State(messages): State<Arc<Messages>>,
    request: Request,
    next: Next,
) -> Response {
    let locale = resolve_locale(request.headers(), messages.default_locale());
    let response = next.run(request).await;

    let Some(kind) = response.extensions().get::<ErrorKind>().copied() else {
        return response;
    };
    if kind.keeps_message() {
        return response;
    }

    let body = serde_json::json!({
        "kind": kind.code(),
        "message": messages.get(locale, kind.message_key()),
    });
    let (mut parts, _) = response.into_parts();
    parts.headers.remove(CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(body.to_string()))
}

/// Wrap a service router with the shared HTTP stack, outermost first:
/// request id, tracing span, request-id propagation, error localization,
/// panic recovery.
pub fn with_http_stack(router: Router, messages: Arc<Messages>) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(request_id_layer())
            .layer(trace_layer())
            .layer(propagate_request_id_layer())
            .layer(from_fn_with_state(messages, localize_errors))
            .layer(catch_panic_layer()),
    )
}
