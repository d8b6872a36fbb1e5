// ============================================================================
// HRM Infrastructure - In-Memory Repositories
// File: crates/hrm-infrastructure/src/memory/mod.rs
// Description: Process-local role and user stores for development and tests
// ============================================================================

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use hrm_core::domain::{Role, UserAccount};
use hrm_core::error::DomainError;
use hrm_core::repositories::{RoleRepository, UserRepository};
use hrm_shared::Pagination;

/// Creation order, then id, matching the Postgres `ORDER BY`.
fn page<T>(mut items: Vec<T>, pagination: Pagination, key: impl Fn(&T) -> (DateTime<Utc>, Uuid)) -> Vec<T> {
    items.sort_by_key(key);
    items
        .into_iter()
        .skip(pagination.offset() as usize)
        .take(pagination.limit() as usize)
        .collect()
}

#[derive(Default)]
pub struct InMemoryRoleRepository {
    roles: RwLock<HashMap<Uuid, Role>>,
}

impl InMemoryRoleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn name_taken(roles: &HashMap<Uuid, Role>, role: &Role) -> bool {
        roles.values().any(|existing| {
            existing.id != role.id
                && !existing.is_deleted()
                && existing.name.eq_ignore_ascii_case(&role.name)
        })
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Role>, DomainError> {
        let roles = self.roles.read().await;
        Ok(roles.get(id).filter(|role| !role.is_deleted()).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, DomainError> {
        let roles = self.roles.read().await;
        Ok(roles
            .values()
            .find(|role| !role.is_deleted() && role.name.eq_ignore_ascii_case(name.trim()))
            .cloned())
    }

    async fn list(&self, pagination: Pagination) -> Result<Vec<Role>, DomainError> {
        let roles = self.roles.read().await;
        let active: Vec<Role> = roles.values().filter(|role| !role.is_deleted()).cloned().collect();
        Ok(page(active, pagination, |role| (role.created_at, role.id)))
    }

    async fn create(&self, role: &Role) -> Result<Role, DomainError> {
        let mut roles = self.roles.write().await;
        if Self::name_taken(&roles, role) {
            warn!("Role name already exists: {}", role.name);
            return Err(DomainError::RoleNameAlreadyExists(role.name.clone()));
        }
        roles.insert(role.id, role.clone());
        debug!(role_id = %role.id, "Role stored in memory");
        Ok(role.clone())
    }

    async fn update(&self, role: &Role) -> Result<Role, DomainError> {
        let mut roles = self.roles.write().await;
        if !roles.get(&role.id).is_some_and(|existing| !existing.is_deleted()) {
            return Err(DomainError::RoleNotFound(role.id));
        }
        if Self::name_taken(&roles, role) {
            return Err(DomainError::RoleNameAlreadyExists(role.name.clone()));
        }
        roles.insert(role.id, role.clone());
        Ok(role.clone())
    }

    async fn delete(&self, id: &Uuid, deleted_by: &Uuid) -> Result<(), DomainError> {
        let mut roles = self.roles.write().await;
        if let Some(role) = roles.get_mut(id) {
            if !role.is_deleted() {
                role.soft_delete(*deleted_by);
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, UserAccount>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn email_taken(users: &HashMap<Uuid, UserAccount>, user: &UserAccount) -> bool {
        users
            .values()
            .any(|existing| existing.id != user.id && existing.email.eq_ignore_ascii_case(&user.email))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserAccount>, DomainError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, DomainError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email.trim()))
            .cloned())
    }

    async fn list(&self, pagination: Pagination) -> Result<Vec<UserAccount>, DomainError> {
        let users: Vec<UserAccount> = self.users.read().await.values().cloned().collect();
        Ok(page(users, pagination, |user| (user.created_at, user.id)))
    }

    async fn create(&self, user: &UserAccount) -> Result<UserAccount, DomainError> {
        let mut users = self.users.write().await;
        if Self::email_taken(&users, user) {
            warn!("Email already exists: {}", user.email);
            return Err(DomainError::EmailAlreadyExists(user.email.clone()));
        }
        users.insert(user.id, user.clone());
        debug!(user_id = %user.id, "User stored in memory");
        Ok(user.clone())
    }

    async fn update(&self, user: &UserAccount) -> Result<UserAccount, DomainError> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(DomainError::UserNotFound(user.id));
        }
        if Self::email_taken(&users, user) {
            return Err(DomainError::EmailAlreadyExists(user.email.clone()));
        }
        users.insert(user.id, user.clone());
        Ok(user.clone())
    }
}
