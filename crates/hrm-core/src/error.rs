//! Domain errors

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Role not found: {0}")]
    RoleNotFound(Uuid),

    #[error("Role name already exists: {0}")]
    RoleNameAlreadyExists(String),

    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Invalid permission catalog: {0}")]
    InvalidCatalog(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(e: validator::ValidationErrors) -> Self {
        DomainError::ValidationError(e.to_string())
    }
}
