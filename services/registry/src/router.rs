use axum::{
    Router,
    routing::{get, post, put},
};

use personnel_core::middleware::with_http_stack;

use crate::handlers::{
    auth::{login, logout, refresh_token, register},
    employee_detail::{list_employee_details, update_employee_details},
    health::{healthz, readyz},
    research_area::{create_research_area, list_research_areas, update_research_area},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let messages = state.messages.clone();
    let router = Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Auth
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh_token))
        .route("/auth/logout", post(logout))
        // Employee details
        .route(
            "/employees/{employee_id}/details",
            get(list_employee_details).put(update_employee_details),
        )
        // Research areas
        .route(
            "/employees/{employee_id}/research-areas",
            get(list_research_areas).post(create_research_area),
        )
        .route(
            "/research-areas/{research_area_id}",
            put(update_research_area),
        )
        .with_state(state);
    with_http_stack(router, messages)
}
