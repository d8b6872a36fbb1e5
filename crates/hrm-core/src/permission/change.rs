//! Serializable matrix mutations, replayed from a form session.

use serde::{Deserialize, Serialize};

use crate::domain::{Action, NodePath};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MatrixChange {
    SetAction { path: NodePath, action: Action, selected: bool },
    SetAllActionsForNode { path: NodePath, selected: bool },
    SetAllForModule { module: String, selected: bool },
    SetAllModules { selected: bool },
}
