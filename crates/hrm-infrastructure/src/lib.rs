//! # HRM Infrastructure
//! 
//! Storage adapters for the repository ports and the permission catalog loader.

pub mod database;
pub mod memory;
pub mod catalog;

pub use database::{create_pool, run_migrations, PgRoleRepository, PgUserRepository};
pub use memory::{InMemoryRoleRepository, InMemoryUserRepository};
pub use catalog::load_catalog;
