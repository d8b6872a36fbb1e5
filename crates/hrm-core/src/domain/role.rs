// ============================================================================
// HRM Core - Role Entity
// File: crates/hrm-core/src/domain/role.rs
// Description: Role with its persisted permission tokens
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Role entity. Permissions are stored only in token form.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Role {
    pub id: Uuid,

    #[validate(length(min = 2, max = 100, message = "Role name must be between 2 and 100 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description too long"))]
    pub description: Option<String>,

    pub permissions: Vec<String>,

    pub is_active: bool,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<Uuid>,
    pub removed_at: Option<DateTime<Utc>>,
    pub removed_by: Option<Uuid>,
}

impl Role {
    pub fn new(
        name: String,
        description: Option<String>,
        permissions: Vec<String>,
        created_by: Option<Uuid>,
    ) -> Result<Self, validator::ValidationErrors> {
        let role = Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            description: description.map(|d| d.trim().to_string()),
            permissions,
            is_active: true,
            created_at: Utc::now(),
            created_by,
            modified_at: None,
            modified_by: None,
            removed_at: None,
            removed_by: None,
        };

        role.validate()?;
        Ok(role)
    }

    pub fn replace_permissions(&mut self, permissions: Vec<String>, modified_by: Option<Uuid>) {
        self.permissions = permissions;
        self.modified_at = Some(Utc::now());
        self.modified_by = modified_by;
    }

    pub fn has_permission(&self, token: &str) -> bool {
        self.permissions.iter().any(|p| p.eq_ignore_ascii_case(token))
    }

    pub fn soft_delete(&mut self, deleted_by: Uuid) {
        self.removed_at = Some(Utc::now());
        self.removed_by = Some(deleted_by);
        self.is_active = false;
    }

    pub fn is_deleted(&self) -> bool {
        self.removed_at.is_some()
    }
}
