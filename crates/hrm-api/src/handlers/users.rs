// ============================================================================
// HRM API - User Handlers
// File: crates/hrm-api/src/handlers/users.rs
// ============================================================================

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use uuid::Uuid;

use hrm_shared::Pagination;

use super::actor;
use crate::dto::{ChangesRequest, CreateUserRequest, MatrixView, PermissionsRequest, UserDto};
use crate::error::ApiError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::response::ApiResponse;
use crate::state::AppState;

/// List users - GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    AppQuery(pagination): AppQuery<Pagination>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, ApiError> {
    let users = state.service.list_users(pagination).await?;
    Ok(Json(ApiResponse::success(users.into_iter().map(UserDto::from).collect())))
}

/// Create user - POST /api/v1/users
pub async fn create_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(payload): AppJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError> {
    let user = state
        .service
        .create_user(&payload.display_name, &payload.email, payload.role_id, actor(&headers))
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(user.into()))))
}

/// User matrix - GET /api/v1/users/{id}/permissions
pub async fn get_permissions(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<MatrixView>>, ApiError> {
    let matrix = state.service.user_matrix(&id).await?;
    Ok(Json(ApiResponse::success(MatrixView::from(&matrix))))
}

/// Replace user permissions - PUT /api/v1/users/{id}/permissions
pub async fn replace_permissions(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<PermissionsRequest>,
) -> Result<Json<ApiResponse<MatrixView>>, ApiError> {
    let matrix = state.service.matrix_from_tokens(&payload.permissions);
    state.service.save_user_permissions(&id, &matrix, actor(&headers)).await?;
    Ok(Json(ApiResponse::success(MatrixView::from(&matrix))))
}

/// Apply matrix changes - PATCH /api/v1/users/{id}/permissions
pub async fn apply_changes(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<ChangesRequest>,
) -> Result<Json<ApiResponse<MatrixView>>, ApiError> {
    let (_, matrix) = state
        .service
        .apply_user_changes(&id, &payload.changes, actor(&headers))
        .await?;
    Ok(Json(ApiResponse::success(MatrixView::from(&matrix))))
}
