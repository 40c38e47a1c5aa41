//! Router-level tests for paths that are rejected before any database access.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Request, StatusCode};
use sea_orm::DatabaseConnection;
use serde_json::json;
use tower::ServiceExt;

use personnel_core::middleware::X_REQUEST_ID;
use personnel_domain::locale::Locale;
use personnel_domain::messages::Messages;
use personnel_registry::router::build_router;
use personnel_registry::state::AppState;
use personnel_testing::auth::{MockAuth, bearer_headers, test_token_manager};
use personnel_testing::http::{TestRequest, read_response};

fn app() -> Router {
    build_router(AppState {
        db: DatabaseConnection::Disconnected,
        tokens: test_token_manager(),
        messages: Arc::new(Messages::builtin(Locale::En)),
    })
}

fn registration(email: &str) -> serde_json::Value {
    json!({
        "tin": "123456789",
        "gender": "M",
        "email": email,
        "password": "s3cret-pass",
    })
}

#[tokio::test]
async fn should_answer_health_checks_with_request_id() {
    let resp = TestRequest::get("/healthz").send(&app()).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.headers.contains_key(X_REQUEST_ID));
}

#[tokio::test]
async fn should_not_be_ready_without_database() {
    let resp = TestRequest::get("/readyz").send(&app()).await;
    assert_eq!(resp.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_return_localized_validation_error_on_register() {
    let resp = TestRequest::post("/auth/register")
        .lang("ru")
        .json(&registration("not-an-email"))
        .send(&app())
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["kind"], "BAD_REQUEST");
    assert_eq!(
        resp.body["message"],
        "Некорректный адрес электронной почты"
    );
}

#[tokio::test]
async fn should_reject_login_without_password() {
    let resp = TestRequest::post("/auth/login")
        .lang("tg")
        .json(&json!({ "email": "ann@example.com", "password": "" }))
        .send(&app())
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["message"], "Рамз бояд аз 1 то 128 аломат бошад");
}

#[tokio::test]
async fn should_reject_garbage_refresh_token_with_localized_unauthorized() {
    let resp = TestRequest::post("/auth/refresh")
        .lang("ru")
        .json(&json!({ "refreshToken": "garbage" }))
        .send(&app())
        .await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body["kind"], "UNAUTHORIZED");
    assert_eq!(resp.body["message"], "Не авторизован");
}

#[tokio::test]
async fn should_reject_access_token_on_logout() {
    let tokens = test_token_manager();
    let access = MockAuth::new(1, "employee").access_token(&tokens);

    let resp = TestRequest::post("/auth/logout")
        .json(&json!({ "refreshToken": access }))
        .send(&app())
        .await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_require_bearer_token_for_details() {
    let resp = TestRequest::get("/employees/1/details").send(&app()).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);

    let resp = TestRequest::get("/employees/1/details")
        .headers(bearer_headers("not-a-jwt"))
        .send(&app())
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_refresh_token_as_bearer() {
    let tokens = test_token_manager();
    let (refresh, _) = tokens.generate_refresh_token(1).unwrap();

    let resp = TestRequest::get("/employees/1/research-areas")
        .headers(bearer_headers(&refresh))
        .send(&app())
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_detail_for_other_employee() {
    let tokens = test_token_manager();
    let resp = TestRequest::put("/employees/1/details")
        .headers(MockAuth::new(1, "employee").headers(&tokens))
        .lang("en")
        .json(&json!({
            "data": [{ "employeeId": 2, "surname": "Smith", "name": "Ann" }]
        }))
        .send(&app())
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.body["message"],
        "Employee id does not match the request path"
    );
}

#[tokio::test]
async fn should_reject_blank_research_area_title() {
    let tokens = test_token_manager();
    let resp = TestRequest::post("/employees/1/research-areas")
        .headers(MockAuth::new(1, "employee").headers(&tokens))
        .json(&json!({ "title": " ", "keyTopics": [] }))
        .send(&app())
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["message"], "Title must not be empty");
}

#[tokio::test]
async fn should_reject_non_numeric_path_id() {
    let tokens = test_token_manager();
    let resp = TestRequest::get("/employees/abc/details")
        .headers(MockAuth::new(1, "employee").headers(&tokens))
        .send(&app())
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["kind"], "BAD_REQUEST");
}

#[tokio::test]
async fn should_reject_malformed_json_body() {
    let request = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{\"email\": "))
        .unwrap();
    let resp = read_response(app().oneshot(request).await.unwrap()).await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["kind"], "BAD_REQUEST");
    assert!(resp.body["message"].is_string());
}
