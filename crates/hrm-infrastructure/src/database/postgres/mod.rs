//! PostgreSQL repository implementations

pub mod role_repo_impl;
pub mod user_repo_impl;

pub use role_repo_impl::PgRoleRepository;
pub use user_repo_impl::PgUserRepository;

use hrm_core::error::DomainError;

/// Unique-index violations surface as domain conflicts, everything else as a
/// database error.
pub(crate) fn map_write_error(e: sqlx::Error, conflict: impl FnOnce() -> DomainError) -> DomainError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => conflict(),
        _ => DomainError::DatabaseError(e.to_string()),
    }
}
