use std::sync::Arc;

use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use personnel_auth_types::token::TokenManager;
use personnel_domain::messages::Messages;

use crate::infra::db::Db;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub tokens: Arc<TokenManager>,
    pub messages: Arc<Messages>,
}

impl AppState {
    pub fn store(&self) -> Db<DatabaseConnection> {
        Db::new(self.db.clone())
    }
}

impl FromRef<AppState> for Arc<TokenManager> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

impl FromRef<AppState> for Arc<Messages> {
    fn from_ref(state: &AppState) -> Self {
        state.messages.clone()
    }
}
