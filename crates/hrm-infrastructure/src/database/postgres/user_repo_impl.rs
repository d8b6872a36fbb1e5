// ============================================================================
// HRM Infrastructure - PostgreSQL User Account Repository
// File: crates/hrm-infrastructure/src/database/postgres/user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use hrm_core::domain::UserAccount;
use hrm_core::error::DomainError;
use hrm_core::repositories::UserRepository;
use hrm_shared::Pagination;

use super::map_write_error;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserAccountRow {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub role_id: Option<Uuid>,
    pub permissions: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub modified_at: Option<DateTime<Utc>>,
    pub modified_by: Option<Uuid>,
}

impl From<UserAccountRow> for UserAccount {
    fn from(row: UserAccountRow) -> Self {
        UserAccount {
            id: row.id,
            display_name: row.display_name,
            email: row.email,
            role_id: row.role_id,
            permissions: row.permissions,
            is_active: row.is_active,
            created_at: row.created_at,
            created_by: row.created_by,
            modified_at: row.modified_at,
            modified_by: row.modified_by,
        }
    }
}

const USER_COLUMNS: &str = "id, display_name, email, role_id, permissions, is_active, \
    created_at, created_by, modified_at, modified_by";

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserAccount>, DomainError> {
        let row: Option<UserAccountRow> = sqlx::query_as(&format!(
            "SELECT {} FROM user_accounts WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding user by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, DomainError> {
        let row: Option<UserAccountRow> = sqlx::query_as(&format!(
            "SELECT {} FROM user_accounts WHERE LOWER(email) = LOWER($1)",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding user by email: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn list(&self, pagination: Pagination) -> Result<Vec<UserAccount>, DomainError> {
        let rows: Vec<UserAccountRow> = sqlx::query_as(&format!(
            "SELECT {} FROM user_accounts ORDER BY created_at, id LIMIT $1 OFFSET $2",
            USER_COLUMNS
        ))
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing users: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, user: &UserAccount) -> Result<UserAccount, DomainError> {
        info!("Creating user with email: {}", user.email);

        let row: UserAccountRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO user_accounts (
                id, display_name, email, role_id, permissions, is_active,
                created_at, created_by, modified_at, modified_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(user.id)
        .bind(&user.display_name)
        .bind(&user.email)
        .bind(user.role_id)
        .bind(&user.permissions)
        .bind(user.is_active)
        .bind(user.created_at)
        .bind(user.created_by)
        .bind(user.modified_at)
        .bind(user.modified_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating user: {}", e);
            map_write_error(e, || DomainError::EmailAlreadyExists(user.email.clone()))
        })?;

        Ok(row.into())
    }

    async fn update(&self, user: &UserAccount) -> Result<UserAccount, DomainError> {
        let row: Option<UserAccountRow> = sqlx::query_as(&format!(
            r#"
            UPDATE user_accounts
            SET
                display_name = $2,
                email = $3,
                role_id = $4,
                permissions = $5,
                is_active = $6,
                modified_at = $7,
                modified_by = $8
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(user.id)
        .bind(&user.display_name)
        .bind(&user.email)
        .bind(user.role_id)
        .bind(&user.permissions)
        .bind(user.is_active)
        .bind(user.modified_at)
        .bind(user.modified_by)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error updating user: {}", e);
            map_write_error(e, || DomainError::EmailAlreadyExists(user.email.clone()))
        })?;

        row.map(Into::into).ok_or(DomainError::UserNotFound(user.id))
    }
}
