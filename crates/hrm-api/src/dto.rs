// ============================================================================
// HRM API - Data Transfer Objects
// File: crates/hrm-api/src/dto.rs
// Description: Request payloads and the matrix view rendered by the forms
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use hrm_core::domain::{ActionSet, NodePath, Role, Scope, SelectionState, UserAccount};
use hrm_core::{MatrixChange, PermissionMatrix};

// ----------------------------------------------------------------------------
// Requests
// ----------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub display_name: String,
    pub email: String,
    pub role_id: Option<Uuid>,
}

/// Full replacement of a permission list.
#[derive(Debug, Deserialize)]
pub struct PermissionsRequest {
    pub permissions: Vec<String>,
}

/// Form-session changes replayed on the stored permissions.
#[derive(Debug, Deserialize)]
pub struct ChangesRequest {
    pub changes: Vec<MatrixChange>,
}

// ----------------------------------------------------------------------------
// Responses
// ----------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct TokensResponse {
    pub permissions: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RoleDto {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub permissions: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl From<Role> for RoleDto {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            name: role.name,
            description: role.description,
            permissions: role.permissions,
            is_active: role.is_active,
            created_at: role.created_at,
            modified_at: role.modified_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<Uuid>,
    pub permissions: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<UserAccount> for UserDto {
    fn from(user: UserAccount) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name,
            email: user.email,
            role_id: user.role_id,
            permissions: user.permissions,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

/// One row of checkboxes.
#[derive(Debug, Serialize)]
pub struct NodeView {
    pub allowed: ActionSet,
    pub selected: ActionSet,
    pub selection: SelectionState,
}

#[derive(Debug, Serialize)]
pub struct FeatureView {
    pub feature_name: String,
    #[serde(flatten)]
    pub node: NodeView,
}

#[derive(Debug, Serialize)]
pub struct SubModuleView {
    pub sub_module_name: String,
    pub selection: SelectionState,
    pub direct: NodeView,
    pub features: Vec<FeatureView>,
}

#[derive(Debug, Serialize)]
pub struct ModuleView {
    pub module_name: String,
    pub selection: SelectionState,
    pub direct: NodeView,
    pub features: Vec<FeatureView>,
    pub sub_modules: Vec<SubModuleView>,
}

/// Tree mirror of a matrix with a tri-state per module, sub-module and row.
#[derive(Debug, Serialize)]
pub struct MatrixView {
    pub permissions: Vec<String>,
    pub selection: SelectionState,
    pub modules: Vec<ModuleView>,
}

fn node_view(matrix: &PermissionMatrix, path: NodePath) -> NodeView {
    let allowed = matrix.allowed_actions(&path).cloned().unwrap_or_default();
    let selected = matrix.selected_actions(&path).cloned().unwrap_or_default();
    let selection = SelectionState::from_counts(selected.len(), allowed.len());
    NodeView { allowed, selected, selection }
}

impl From<&PermissionMatrix> for MatrixView {
    fn from(matrix: &PermissionMatrix) -> Self {
        let modules = matrix
            .template()
            .modules
            .iter()
            .map(|module| {
                let m = module.module_name.as_str();
                let features = module
                    .features
                    .iter()
                    .map(|f| FeatureView {
                        feature_name: f.feature_name.clone(),
                        node: node_view(matrix, NodePath::feature(m, &f.feature_name)),
                    })
                    .collect();
                let sub_modules = module
                    .sub_modules
                    .iter()
                    .map(|sub| {
                        let s = sub.sub_module_name.as_str();
                        SubModuleView {
                            sub_module_name: sub.sub_module_name.clone(),
                            selection: matrix.selection(&Scope::SubModule {
                                module: m.to_string(),
                                sub_module: s.to_string(),
                            }),
                            direct: node_view(matrix, NodePath::sub_module_direct(m, s)),
                            features: sub
                                .features
                                .iter()
                                .map(|f| FeatureView {
                                    feature_name: f.feature_name.clone(),
                                    node: node_view(matrix, NodePath::sub_module_feature(m, s, &f.feature_name)),
                                })
                                .collect(),
                        }
                    })
                    .collect();

                ModuleView {
                    module_name: module.module_name.clone(),
                    selection: matrix.selection(&Scope::Module { module: m.to_string() }),
                    direct: node_view(matrix, NodePath::direct(m)),
                    features,
                    sub_modules,
                }
            })
            .collect();

        Self {
            permissions: matrix.to_tokens(),
            selection: matrix.selection(&Scope::All),
            modules,
        }
    }
}
