//! # HRM Core
//! 
//! Permission-matrix model, token codec, domain entities, repository ports
//! and the permission service shared by the role and user management forms.

pub mod domain;
pub mod permission;
pub mod services;
pub mod repositories;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use permission::{MatrixChange, PermissionMatrix};
pub use error::DomainError;
