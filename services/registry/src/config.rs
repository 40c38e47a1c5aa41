use chrono::Duration;
use serde::Deserialize;

use personnel_auth_types::token::TokenManager;
use personnel_core::config::Config;
use personnel_domain::locale::Locale;

/// Registry service configuration loaded from environment variables
/// (field `database_url` ↔ env var `DATABASE_URL`).
#[derive(Deserialize)]
pub struct RegistryConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port to listen on (default 3120).
    #[serde(default = "default_port")]
    pub registry_port: u16,
    /// HMAC secret for access tokens.
    pub access_token_secret: String,
    /// HMAC secret for refresh tokens. Must differ from the access secret.
    pub refresh_token_secret: String,
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_secs: i64,
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_secs: i64,
    /// Language for requests without a supported `Accept-Language` (default `en`).
    #[serde(default)]
    pub default_locale: Locale,
}

impl Config for RegistryConfig {}

fn default_port() -> u16 {
    3120
}

fn default_access_ttl() -> i64 {
    15 * 60
}

fn default_refresh_ttl() -> i64 {
    7 * 24 * 60 * 60
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must not be empty")]
    EmptySecret(&'static str),
    #[error("ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET must differ")]
    SharedSecret,
    #[error("{0} must be positive")]
    NonPositiveTtl(&'static str),
}

impl RegistryConfig {
    /// Reject configurations that would make tokens forgeable or unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_token_secret.is_empty() {
            return Err(ConfigError::EmptySecret("ACCESS_TOKEN_SECRET"));
        }
        if self.refresh_token_secret.is_empty() {
            return Err(ConfigError::EmptySecret("REFRESH_TOKEN_SECRET"));
        }
        if self.access_token_secret == self.refresh_token_secret {
            return Err(ConfigError::SharedSecret);
        }
        if self.access_token_ttl_secs <= 0 {
            return Err(ConfigError::NonPositiveTtl("ACCESS_TOKEN_TTL_SECS"));
        }
        if self.refresh_token_ttl_secs <= 0 {
            return Err(ConfigError::NonPositiveTtl("REFRESH_TOKEN_TTL_SECS"));
        }
        Ok(())
    }

    pub fn token_manager(&self) -> TokenManager {
        TokenManager::new(
            &self.access_token_secret,
            &self.refresh_token_secret,
            Duration::seconds(self.access_token_ttl_secs),
            Duration::seconds(self.refresh_token_ttl_secs),
        )
    }
}
