//! User repository trait (port)

use async_trait::async_trait;
use hrm_shared::Pagination;
use uuid::Uuid;

use crate::domain::UserAccount;
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<UserAccount>, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, DomainError>;
    async fn list(&self, pagination: Pagination) -> Result<Vec<UserAccount>, DomainError>;
    async fn create(&self, user: &UserAccount) -> Result<UserAccount, DomainError>;
    async fn update(&self, user: &UserAccount) -> Result<UserAccount, DomainError>;
}
