//! # HRM Core - Domain Module
//! 
//! Permission catalog, selection state and the entities that carry
//! permission tokens.

pub mod action;
pub mod catalog;
pub mod path;
pub mod state;
pub mod role;
pub mod user_account;

// Re-export all entities and enums
pub use action::{Action, ActionSet};
pub use catalog::{
    FeatureTemplate, ImpliedReadRule, ModuleTemplate, PermissionCatalog, PermissionTemplate,
    SubModuleTemplate,
};
pub use path::{NodePath, NodeTarget, Scope, SelectionState};
pub use state::{FeatureState, ModuleState, PermissionState, SubModuleState};
pub use role::Role;
pub use user_account::UserAccount;
