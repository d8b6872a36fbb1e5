// ============================================================================
// HRM API - Permission Catalog Handlers
// File: crates/hrm-api/src/handlers/catalog.rs
// ============================================================================

use axum::{extract::State, Json};

use hrm_core::domain::PermissionCatalog;

use crate::dto::{MatrixView, PermissionsRequest, TokensResponse};
use crate::extract::AppJson;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Catalog handler - GET /api/v1/permissions/catalog
pub async fn get_catalog(State(state): State<AppState>) -> Json<ApiResponse<PermissionCatalog>> {
    Json(ApiResponse::success(state.service.catalog().as_ref().clone()))
}

/// Blank matrix for the add-role and add-user forms - GET /api/v1/permissions/blank
pub async fn blank_matrix(State(state): State<AppState>) -> Json<ApiResponse<MatrixView>> {
    let matrix = state.service.blank_matrix();
    Json(ApiResponse::success(MatrixView::from(&matrix)))
}

/// Canonical token list - POST /api/v1/permissions/normalize
pub async fn normalize(
    State(state): State<AppState>,
    AppJson(payload): AppJson<PermissionsRequest>,
) -> Json<ApiResponse<TokensResponse>> {
    let permissions = state.service.normalize_tokens(&payload.permissions);
    Json(ApiResponse::success(TokensResponse { permissions }))
}
