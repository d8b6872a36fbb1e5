// ============================================================================
// HRM Infrastructure - PostgreSQL Role Repository
// File: crates/hrm-infrastructure/src/database/postgres/role_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use hrm_core::domain::Role;
use hrm_core::error::DomainError;
use hrm_core::repositories::RoleRepository;
use hrm_shared::Pagination;

use super::map_write_error;

pub struct PgRoleRepository {
    pool: PgPool,
}

impl PgRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct RoleRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub permissions: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<Uuid>,
    pub removed_at: Option<DateTime<Utc>>,
    pub removed_by: Option<Uuid>,
}

impl From<RoleRow> for Role {
    fn from(row: RoleRow) -> Self {
        Role {
            id: row.id,
            name: row.name,
            description: row.description,
            permissions: row.permissions,
            is_active: row.is_active,
            created_at: row.created_at,
            created_by: row.created_by,
            modified_at: row.modified_at,
            modified_by: row.modified_by,
            removed_at: row.removed_at,
            removed_by: row.removed_by,
        }
    }
}

const ROLE_COLUMNS: &str = "id, name, description, permissions, is_active, \
    created_at, created_by, modified_at, modified_by, removed_at, removed_by";

#[async_trait]
impl RoleRepository for PgRoleRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Role>, DomainError> {
        let row: Option<RoleRow> = sqlx::query_as(&format!(
            "SELECT {} FROM roles WHERE id = $1 AND removed_at IS NULL",
            ROLE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding role by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, DomainError> {
        let row: Option<RoleRow> = sqlx::query_as(&format!(
            "SELECT {} FROM roles WHERE LOWER(name) = LOWER($1) AND removed_at IS NULL",
            ROLE_COLUMNS
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding role by name: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn list(&self, pagination: Pagination) -> Result<Vec<Role>, DomainError> {
        let rows: Vec<RoleRow> = sqlx::query_as(&format!(
            "SELECT {} FROM roles WHERE removed_at IS NULL ORDER BY created_at, id LIMIT $1 OFFSET $2",
            ROLE_COLUMNS
        ))
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing roles: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, role: &Role) -> Result<Role, DomainError> {
        info!("Creating role: {}", role.name);

        let row: RoleRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO roles (
                id, name, description, permissions, is_active,
                created_at, created_by, modified_at, modified_by, removed_at, removed_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            ROLE_COLUMNS
        ))
        .bind(role.id)
        .bind(&role.name)
        .bind(&role.description)
        .bind(&role.permissions)
        .bind(role.is_active)
        .bind(role.created_at)
        .bind(role.created_by)
        .bind(role.modified_at)
        .bind(role.modified_by)
        .bind(role.removed_at)
        .bind(role.removed_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating role: {}", e);
            map_write_error(e, || DomainError::RoleNameAlreadyExists(role.name.clone()))
        })?;

        Ok(row.into())
    }

    async fn update(&self, role: &Role) -> Result<Role, DomainError> {
        let row: Option<RoleRow> = sqlx::query_as(&format!(
            r#"
            UPDATE roles
            SET
                name = $2,
                description = $3,
                permissions = $4,
                is_active = $5,
                modified_at = $6,
                modified_by = $7
            WHERE id = $1 AND removed_at IS NULL
            RETURNING {}
            "#,
            ROLE_COLUMNS
        ))
        .bind(role.id)
        .bind(&role.name)
        .bind(&role.description)
        .bind(&role.permissions)
        .bind(role.is_active)
        .bind(role.modified_at)
        .bind(role.modified_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error updating role: {}", e);
            map_write_error(e, || DomainError::RoleNameAlreadyExists(role.name.clone()))
        })?;

        row.map(Into::into).ok_or(DomainError::RoleNotFound(role.id))
    }

    async fn delete(&self, id: &Uuid, deleted_by: &Uuid) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE roles
            SET removed_at = NOW(), removed_by = $2, is_active = false
            WHERE id = $1 AND removed_at IS NULL
            "#
        )
        .bind(id)
        .bind(deleted_by)
        .execute(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error deleting role: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }
}
