// ============================================================================
// HRM Core - Action Vocabulary
// File: crates/hrm-core/src/domain/action.rs
// Description: Closed set of operations a permission can grant
// ============================================================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One permitted operation kind. Ordering follows declaration order so that
/// token output is stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
    Upload,
    Approval,
    Sync,
}

/// Ordered set of actions, used for both allowed and selected sets.
pub type ActionSet = BTreeSet<Action>;

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Read,
        Action::Create,
        Action::Update,
        Action::Delete,
        Action::Upload,
        Action::Approval,
        Action::Sync,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Upload => "upload",
            Action::Approval => "approval",
            Action::Sync => "sync",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "read" => Some(Action::Read),
            "create" => Some(Action::Create),
            "update" => Some(Action::Update),
            "delete" => Some(Action::Delete),
            "upload" => Some(Action::Upload),
            "approval" => Some(Action::Approval),
            "sync" => Some(Action::Sync),
            _ => None,
        }
    }

    /// The four basic CRUD actions most catalog rows carry.
    pub fn crud() -> ActionSet {
        [Action::Read, Action::Create, Action::Update, Action::Delete]
            .into_iter()
            .collect()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
