//! Token fixtures for integration tests.

use std::sync::Arc;

use axum::http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
use chrono::Duration;

use personnel_auth_types::token::TokenManager;

pub const TEST_ACCESS_SECRET: &str = "test-access-secret";
pub const TEST_REFRESH_SECRET: &str = "test-refresh-secret";

/// Token manager with fixed test secrets and the default lifetimes
/// (15 minutes access, 7 days refresh).
pub fn test_token_manager() -> Arc<TokenManager> {
    Arc::new(TokenManager::new(
        TEST_ACCESS_SECRET,
        TEST_REFRESH_SECRET,
        Duration::minutes(15),
        Duration::days(7),
    ))
}

/// Identity to authenticate test requests as.
pub struct MockAuth {
    pub user_id: i64,
    pub role: String,
}

impl MockAuth {
    pub fn new(user_id: i64, role: impl Into<String>) -> Self {
        Self {
            user_id,
            role: role.into(),
        }
    }

    /// Fresh access token for this identity, signed by `tokens`.
    pub fn access_token(&self, tokens: &TokenManager) -> String {
        let (token, _) = tokens
            .generate_access_token(self.user_id, &self.role)
            .expect("sign test access token");
        token
    }

    /// `Authorization: Bearer ...` header map for this identity.
    pub fn headers(&self, tokens: &TokenManager) -> HeaderMap {
        bearer_headers(&self.access_token(tokens))
    }
}

pub fn bearer_headers(token: &str) -> HeaderMap {
    let mut map = HeaderMap::new();
    map.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).expect("valid header value"),
    );
    map
}
