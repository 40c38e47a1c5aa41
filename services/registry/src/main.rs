use std::sync::Arc;

use sea_orm::Database;
use tracing::info;

use personnel_core::config::Config;
use personnel_core::tracing::init_tracing;
use personnel_domain::messages::Messages;
use personnel_registry::config::RegistryConfig;
use personnel_registry::router::build_router;
use personnel_registry::state::AppState;

#[tokio::main]
async fn main() {
    init_tracing("info,sqlx=warn,sea_orm=info");

    let config = RegistryConfig::from_env();
    if let Err(e) = config.validate() {
        panic!("invalid configuration: {e}");
    }

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db,
        tokens: Arc::new(config.token_manager()),
        messages: Arc::new(Messages::builtin(config.default_locale)),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.registry_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!(default_locale = %config.default_locale, "registry service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
