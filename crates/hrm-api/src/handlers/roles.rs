// ============================================================================
// HRM API - Role Handlers
// File: crates/hrm-api/src/handlers/roles.rs
// ============================================================================
//! Role management: list, create, delete and edit the permission matrix.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use uuid::Uuid;

use hrm_shared::Pagination;

use super::actor;
use crate::dto::{ChangesRequest, CreateRoleRequest, MatrixView, PermissionsRequest, RoleDto};
use crate::error::ApiError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::response::ApiResponse;
use crate::state::AppState;

/// List roles - GET /api/v1/roles
pub async fn list_roles(
    State(state): State<AppState>,
    AppQuery(pagination): AppQuery<Pagination>,
) -> Result<Json<ApiResponse<Vec<RoleDto>>>, ApiError> {
    let roles = state.service.list_roles(pagination).await?;
    Ok(Json(ApiResponse::success(roles.into_iter().map(RoleDto::from).collect())))
}

/// Create role - POST /api/v1/roles
pub async fn create_role(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(payload): AppJson<CreateRoleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RoleDto>>), ApiError> {
    let matrix = state.service.matrix_from_tokens(&payload.permissions);
    let role = state
        .service
        .create_role(&payload.name, payload.description, &matrix, actor(&headers))
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(role.into()))))
}

/// Delete role - DELETE /api/v1/roles/{id}
pub async fn delete_role(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let deleted_by = actor(&headers)
        .ok_or_else(|| ApiError::BadRequest("x-actor-id header is required to delete a role".to_string()))?;
    state.service.delete_role(&id, &deleted_by).await?;
    Ok(Json(ApiResponse::success(())))
}

/// Role matrix - GET /api/v1/roles/{id}/permissions
pub async fn get_permissions(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<MatrixView>>, ApiError> {
    let matrix = state.service.role_matrix(&id).await?;
    Ok(Json(ApiResponse::success(MatrixView::from(&matrix))))
}

/// Replace role permissions - PUT /api/v1/roles/{id}/permissions
pub async fn replace_permissions(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<PermissionsRequest>,
) -> Result<Json<ApiResponse<MatrixView>>, ApiError> {
    let matrix = state.service.matrix_from_tokens(&payload.permissions);
    state.service.save_role_permissions(&id, &matrix, actor(&headers)).await?;
    Ok(Json(ApiResponse::success(MatrixView::from(&matrix))))
}

/// Apply matrix changes - PATCH /api/v1/roles/{id}/permissions
pub async fn apply_changes(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<ChangesRequest>,
) -> Result<Json<ApiResponse<MatrixView>>, ApiError> {
    let (_, matrix) = state
        .service
        .apply_role_changes(&id, &payload.changes, actor(&headers))
        .await?;
    Ok(Json(ApiResponse::success(MatrixView::from(&matrix))))
}
