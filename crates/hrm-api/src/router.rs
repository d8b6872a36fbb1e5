// ============================================================================
// HRM API - Router
// File: crates/hrm-api/src/router.rs
// ============================================================================

use std::time::Duration;

use axum::{
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::warn;

use crate::handlers::{catalog, health, roles, users, ACTOR_HEADER};
use crate::state::AppState;

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(ACTOR_HEADER)]);

    if origin == "*" {
        return layer.allow_origin(Any);
    }
    match origin.parse::<HeaderValue>() {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            warn!("Invalid CORS origin {:?}, cross-origin requests disabled", origin);
            layer
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.app.request_timeout_secs);
    let cors = cors_layer(&state.config.app.cors_origin);

    Router::new()
        .route("/health", get(health::health_check))
        // Catalog and token helpers
        .route("/api/v1/permissions/catalog", get(catalog::get_catalog))
        .route("/api/v1/permissions/blank", get(catalog::blank_matrix))
        .route("/api/v1/permissions/normalize", post(catalog::normalize))
        // Role management
        .route("/api/v1/roles", get(roles::list_roles).post(roles::create_role))
        .route("/api/v1/roles/{id}", delete(roles::delete_role))
        .route(
            "/api/v1/roles/{id}/permissions",
            get(roles::get_permissions)
                .put(roles::replace_permissions)
                .patch(roles::apply_changes),
        )
        // User management
        .route("/api/v1/users", get(users::list_users).post(users::create_user))
        .route(
            "/api/v1/users/{id}/permissions",
            get(users::get_permissions)
                .put(users::replace_permissions)
                .patch(users::apply_changes),
        )
        .fallback(health::not_found)
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}
