use axum::extract::rejection::JsonRejection;
use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use personnel_core::locale::Lang;
use personnel_domain::user::UserType;

use crate::error::RegistryError;
use crate::state::AppState;
use crate::usecase::auth::{
    AuthOutput, LoginInput, LoginUseCase, LogoutUseCase, RefreshTokenUseCase, RegisterInput,
    RegisterUseCase,
};

// ── Request / response types ─────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub tin: String,
    pub gender: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub uid: String,
    pub user_role: UserType,
}

impl From<AuthOutput> for AuthResponse {
    fn from(output: AuthOutput) -> Self {
        Self {
            access_token: output.access_token,
            refresh_token: output.refresh_token,
            token_type: output.token_type,
            uid: output.uid,
            user_role: output.user_role,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

pub async fn register(
    State(state): State<AppState>,
    Lang(locale): Lang,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<StatusCode, RegistryError> {
    let Json(body) = body?;
    let usecase = RegisterUseCase {
        store: state.store(),
        messages: state.messages.clone(),
    };
    usecase
        .execute(RegisterInput {
            tin: body.tin,
            gender: body.gender,
            email: body.email,
            password: body.password,
            locale,
        })
        .await?;
    Ok(StatusCode::CREATED)
}

pub async fn login(
    State(state): State<AppState>,
    Lang(locale): Lang,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, RegistryError> {
    let Json(body) = body?;
    let usecase = LoginUseCase {
        repo: state.store(),
        tokens: state.tokens.clone(),
        messages: state.messages.clone(),
    };
    let output = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
            locale,
        })
        .await?;
    Ok(Json(output.into()))
}

pub async fn refresh_token(
    State(state): State<AppState>,
    body: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, RegistryError> {
    let Json(body) = body?;
    let usecase = RefreshTokenUseCase {
        store: state.store(),
        tokens: state.tokens.clone(),
    };
    let output = usecase.execute(&body.refresh_token).await?;
    Ok(Json(output.into()))
}

pub async fn logout(
    State(state): State<AppState>,
    body: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> Result<StatusCode, RegistryError> {
    let Json(body) = body?;
    let usecase = LogoutUseCase {
        repo: state.store(),
        tokens: state.tokens.clone(),
    };
    usecase.execute(&body.refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}
