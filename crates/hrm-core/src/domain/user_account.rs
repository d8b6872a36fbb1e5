// ============================================================================
// HRM Core - User Account Entity
// File: crates/hrm-core/src/domain/user_account.rs
// Description: Back-office user with per-user permission tokens
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// User account edited by the User-management form.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserAccount {
    pub id: Uuid,

    #[validate(length(min = 2, max = 100, message = "Display name must be between 2 and 100 characters"))]
    pub display_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub role_id: Option<Uuid>,

    pub permissions: Vec<String>,

    pub is_active: bool,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<Uuid>,
}

impl UserAccount {
    pub fn new(
        display_name: String,
        email: String,
        role_id: Option<Uuid>,
        created_by: Option<Uuid>,
    ) -> Result<Self, validator::ValidationErrors> {
        let user = Self {
            id: Uuid::new_v4(),
            display_name: display_name.trim().to_string(),
            email: email.trim().to_lowercase(),
            role_id,
            permissions: Vec::new(),
            is_active: true,
            created_at: Utc::now(),
            created_by,
            modified_at: None,
            modified_by: None,
        };

        user.validate()?;
        Ok(user)
    }

    pub fn replace_permissions(&mut self, permissions: Vec<String>, modified_by: Option<Uuid>) {
        self.permissions = permissions;
        self.modified_at = Some(Utc::now());
        self.modified_by = modified_by;
    }
}
