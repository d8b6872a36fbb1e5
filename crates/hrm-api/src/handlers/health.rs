use axum::extract::State;
use serde::Serialize;

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    service: String,
    environment: String,
    version: String,
}

/// Health handler - GET /health
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthResponse> {
    ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        service: state.config.app.name.clone(),
        environment: state.config.app.env.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Unmatched routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound("No such route".to_string())
}
