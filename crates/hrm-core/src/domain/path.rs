// ============================================================================
// HRM Core - Matrix Addressing
// File: crates/hrm-core/src/domain/path.rs
// Description: Typed paths into the permission tree and tri-state selection
// ============================================================================

use serde::{Deserialize, Serialize};

/// Which action row inside a module a path points at.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeTarget {
    /// The module's own action row.
    Direct,
    Feature { feature: String },
    SubModuleDirect { sub_module: String },
    SubModuleFeature { sub_module: String, feature: String },
}

/// A single selectable action row: one module plus a target inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodePath {
    pub module: String,
    pub target: NodeTarget,
}

impl NodePath {
    pub fn direct(module: &str) -> Self {
        Self { module: module.to_string(), target: NodeTarget::Direct }
    }

    pub fn feature(module: &str, feature: &str) -> Self {
        Self {
            module: module.to_string(),
            target: NodeTarget::Feature { feature: feature.to_string() },
        }
    }

    pub fn sub_module_direct(module: &str, sub_module: &str) -> Self {
        Self {
            module: module.to_string(),
            target: NodeTarget::SubModuleDirect { sub_module: sub_module.to_string() },
        }
    }

    pub fn sub_module_feature(module: &str, sub_module: &str, feature: &str) -> Self {
        Self {
            module: module.to_string(),
            target: NodeTarget::SubModuleFeature {
                sub_module: sub_module.to_string(),
                feature: feature.to_string(),
            },
        }
    }
}

/// Region of the tree whose selection is inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum Scope {
    All,
    Module { module: String },
    SubModule { module: String, sub_module: String },
    Node { path: NodePath },
}

/// Checkbox state of a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionState {
    Empty,
    Partial,
    Full,
}

impl SelectionState {
    /// `allowed == 0` counts as full, matching the recursive definition.
    pub fn from_counts(selected: usize, allowed: usize) -> Self {
        if selected >= allowed {
            SelectionState::Full
        } else if selected == 0 {
            SelectionState::Empty
        } else {
            SelectionState::Partial
        }
    }

    pub fn is_full(&self) -> bool {
        matches!(self, SelectionState::Full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_from_counts() {
        assert_eq!(SelectionState::from_counts(0, 3), SelectionState::Empty);
        assert_eq!(SelectionState::from_counts(2, 3), SelectionState::Partial);
        assert_eq!(SelectionState::from_counts(3, 3), SelectionState::Full);
        assert_eq!(SelectionState::from_counts(0, 0), SelectionState::Full);
    }

    #[test]
    fn test_node_path_serde_shape() {
        let path = NodePath::sub_module_feature("Hiring", "Vacancy", "Candidate");
        let json = serde_json::to_value(&path).unwrap();
        assert_eq!(json["module"], "Hiring");
        assert_eq!(json["target"]["kind"], "sub_module_feature");
        assert_eq!(json["target"]["sub_module"], "Vacancy");

        let back: NodePath = serde_json::from_value(json).unwrap();
        assert_eq!(back, path);
    }
}
