// ============================================================================
// HRM Core - Permission State
// File: crates/hrm-core/src/domain/state.rs
// Description: Mutable selection tree mirroring a permission template
// ============================================================================

use serde::{Deserialize, Serialize};

use super::action::ActionSet;
use super::catalog::{FeatureTemplate, ModuleTemplate, PermissionTemplate, SubModuleTemplate};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureState {
    pub feature_name: String,
    pub selected_actions: ActionSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubModuleState {
    pub sub_module_name: String,
    pub selected_direct_actions: ActionSet,
    pub features: Vec<FeatureState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleState {
    pub module_name: String,
    pub selected_direct_actions: ActionSet,
    pub features: Vec<FeatureState>,
    pub sub_modules: Vec<SubModuleState>,
}

/// Selections for one role or user. Built from a template, so node `i` of the
/// state always corresponds to node `i` of the template.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PermissionState {
    pub modules: Vec<ModuleState>,
}

fn fill(allowed: &ActionSet, selected: bool) -> ActionSet {
    if selected {
        allowed.clone()
    } else {
        ActionSet::new()
    }
}

impl FeatureState {
    pub fn from_template(template: &FeatureTemplate, selected: bool) -> Self {
        Self {
            feature_name: template.feature_name.clone(),
            selected_actions: fill(&template.allowed_actions, selected),
        }
    }
}

impl SubModuleState {
    pub fn from_template(template: &SubModuleTemplate, selected: bool) -> Self {
        Self {
            sub_module_name: template.sub_module_name.clone(),
            selected_direct_actions: fill(&template.direct_actions, selected),
            features: template
                .features
                .iter()
                .map(|f| FeatureState::from_template(f, selected))
                .collect(),
        }
    }

    pub fn has_feature_selection(&self) -> bool {
        self.features.iter().any(|f| !f.selected_actions.is_empty())
    }

    pub fn selected_count(&self) -> usize {
        self.selected_direct_actions.len()
            + self.features.iter().map(|f| f.selected_actions.len()).sum::<usize>()
    }
}

impl ModuleState {
    pub fn from_template(template: &ModuleTemplate, selected: bool) -> Self {
        Self {
            module_name: template.module_name.clone(),
            selected_direct_actions: fill(&template.direct_actions, selected),
            features: template
                .features
                .iter()
                .map(|f| FeatureState::from_template(f, selected))
                .collect(),
            sub_modules: template
                .sub_modules
                .iter()
                .map(|s| SubModuleState::from_template(s, selected))
                .collect(),
        }
    }

    pub fn has_feature_selection(&self) -> bool {
        self.features.iter().any(|f| !f.selected_actions.is_empty())
    }

    pub fn selected_count(&self) -> usize {
        self.selected_direct_actions.len()
            + self.features.iter().map(|f| f.selected_actions.len()).sum::<usize>()
            + self.sub_modules.iter().map(SubModuleState::selected_count).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.selected_count() == 0
    }
}

impl PermissionState {
    /// Fresh tree, every node either fully selected or empty.
    pub fn from_template(template: &PermissionTemplate, selected: bool) -> Self {
        Self {
            modules: template
                .modules
                .iter()
                .map(|m| ModuleState::from_template(m, selected))
                .collect(),
        }
    }

    pub fn empty(template: &PermissionTemplate) -> Self {
        Self::from_template(template, false)
    }

    pub fn selected_count(&self) -> usize {
        self.modules.iter().map(ModuleState::selected_count).sum()
    }

    /// True when the state has exactly the template's names and the
    /// selection at every node is within the allowed set.
    pub fn conforms_to(&self, template: &PermissionTemplate) -> bool {
        fn features_conform(states: &[FeatureState], templates: &[FeatureTemplate]) -> bool {
            states.len() == templates.len()
                && states.iter().zip(templates).all(|(s, t)| {
                    s.feature_name == t.feature_name && s.selected_actions.is_subset(&t.allowed_actions)
                })
        }

        self.modules.len() == template.modules.len()
            && self.modules.iter().zip(&template.modules).all(|(m, mt)| {
                m.module_name == mt.module_name
                    && m.selected_direct_actions.is_subset(&mt.direct_actions)
                    && features_conform(&m.features, &mt.features)
                    && m.sub_modules.len() == mt.sub_modules.len()
                    && m.sub_modules.iter().zip(&mt.sub_modules).all(|(s, st)| {
                        s.sub_module_name == st.sub_module_name
                            && s.selected_direct_actions.is_subset(&st.direct_actions)
                            && features_conform(&s.features, &st.features)
                    })
            })
    }
}
