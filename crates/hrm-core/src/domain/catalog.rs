// ============================================================================
// HRM Core - Permission Catalog
// File: crates/hrm-core/src/domain/catalog.rs
// Description: Static module/feature/sub-module template and implied-read rules
// ============================================================================

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use validator::Validate;

use super::action::{Action, ActionSet};
use crate::error::DomainError;
use crate::permission::codec::normalize_segment;

/// A named capability inside a module or sub-module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct FeatureTemplate {
    #[validate(length(min = 1, max = 100, message = "Feature name must be between 1 and 100 characters"))]
    pub feature_name: String,

    #[serde(default)]
    pub allowed_actions: ActionSet,
}

/// Second-level grouping inside a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SubModuleTemplate {
    #[validate(length(min = 1, max = 100, message = "Sub-module name must be between 1 and 100 characters"))]
    pub sub_module_name: String,

    #[serde(default)]
    pub direct_actions: ActionSet,

    #[serde(default)]
    #[validate(nested)]
    pub features: Vec<FeatureTemplate>,
}

/// Top-level permission category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ModuleTemplate {
    #[validate(length(min = 1, max = 100, message = "Module name must be between 1 and 100 characters"))]
    pub module_name: String,

    #[serde(default)]
    pub direct_actions: ActionSet,

    #[serde(default)]
    #[validate(nested)]
    pub features: Vec<FeatureTemplate>,

    #[serde(default)]
    #[validate(nested)]
    pub sub_modules: Vec<SubModuleTemplate>,
}

/// Ordered, read-only shape every permission state is derived from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Validate)]
pub struct PermissionTemplate {
    #[validate(nested)]
    pub modules: Vec<ModuleTemplate>,
}

/// Grants `prv_{module}_read` whenever any feature of the module (or of one of
/// the listed sub-modules) is selected, and `prv_{module}_{sub}_read` whenever
/// any feature of a listed sub-module is selected.
///
/// When the module (or sub-module) also allows a direct `read`, a saved
/// implied token decodes back as that direct selection and survives clearing
/// the features that produced it. Leave `read` out of the direct actions if
/// revoking the features must revoke the read too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpliedReadRule {
    pub module: String,
    #[serde(default)]
    pub sub_modules: Vec<String>,
}

/// Template plus the per-module implied-read configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionCatalog {
    #[serde(flatten)]
    pub template: PermissionTemplate,

    #[serde(default)]
    pub implied_reads: Vec<ImpliedReadRule>,
}

fn find_name<'a, T>(items: &'a [T], name: &str, key: impl Fn(&T) -> &str) -> Option<&'a T> {
    items.iter().find(|item| key(item).eq_ignore_ascii_case(name))
}

impl FeatureTemplate {
    pub fn new(feature_name: &str, allowed_actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            feature_name: feature_name.to_string(),
            allowed_actions: allowed_actions.into_iter().collect(),
        }
    }
}

impl SubModuleTemplate {
    pub fn new(
        sub_module_name: &str,
        direct_actions: impl IntoIterator<Item = Action>,
        features: Vec<FeatureTemplate>,
    ) -> Self {
        Self {
            sub_module_name: sub_module_name.to_string(),
            direct_actions: direct_actions.into_iter().collect(),
            features,
        }
    }

    pub fn feature(&self, name: &str) -> Option<&FeatureTemplate> {
        find_name(&self.features, name, |f| f.feature_name.as_str())
    }

    /// Number of grantable actions in this sub-module's subtree.
    pub fn allowed_count(&self) -> usize {
        self.direct_actions.len()
            + self.features.iter().map(|f| f.allowed_actions.len()).sum::<usize>()
    }
}

impl ModuleTemplate {
    pub fn new(module_name: &str, direct_actions: impl IntoIterator<Item = Action>) -> Self {
        Self {
            module_name: module_name.to_string(),
            direct_actions: direct_actions.into_iter().collect(),
            features: Vec::new(),
            sub_modules: Vec::new(),
        }
    }

    pub fn with_feature(mut self, feature: FeatureTemplate) -> Self {
        self.features.push(feature);
        self
    }

    pub fn with_sub_module(mut self, sub_module: SubModuleTemplate) -> Self {
        self.sub_modules.push(sub_module);
        self
    }

    pub fn feature(&self, name: &str) -> Option<&FeatureTemplate> {
        find_name(&self.features, name, |f| f.feature_name.as_str())
    }

    pub fn sub_module(&self, name: &str) -> Option<&SubModuleTemplate> {
        find_name(&self.sub_modules, name, |s| s.sub_module_name.as_str())
    }

    pub fn allowed_count(&self) -> usize {
        self.direct_actions.len()
            + self.features.iter().map(|f| f.allowed_actions.len()).sum::<usize>()
            + self.sub_modules.iter().map(SubModuleTemplate::allowed_count).sum::<usize>()
    }
}

impl PermissionTemplate {
    pub fn new(modules: Vec<ModuleTemplate>) -> Self {
        Self { modules }
    }

    pub fn module(&self, name: &str) -> Option<&ModuleTemplate> {
        find_name(&self.modules, name, |m| m.module_name.as_str())
    }

    pub fn allowed_count(&self) -> usize {
        self.modules.iter().map(ModuleTemplate::allowed_count).sum()
    }
}

impl PermissionCatalog {
    pub fn new(template: PermissionTemplate, implied_reads: Vec<ImpliedReadRule>) -> Result<Self, DomainError> {
        let catalog = Self { template, implied_reads };
        catalog.check()?;
        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        let catalog: Self = serde_json::from_str(json)
            .map_err(|e| DomainError::InvalidCatalog(e.to_string()))?;
        catalog.check()?;
        Ok(catalog)
    }

    pub fn implied_read_rule(&self, module: &str) -> Option<&ImpliedReadRule> {
        self.implied_reads
            .iter()
            .find(|rule| rule.module.eq_ignore_ascii_case(module))
    }

    /// Structural checks that keep token encoding unambiguous.
    pub fn check(&self) -> Result<(), DomainError> {
        self.template
            .validate()
            .map_err(|e| DomainError::InvalidCatalog(e.to_string()))?;

        let mut modules = HashSet::new();
        for module in &self.template.modules {
            let key = checked_segment(&module.module_name)?;
            if !modules.insert(key) {
                return Err(DomainError::InvalidCatalog(format!(
                    "duplicate module: {}",
                    module.module_name
                )));
            }

            // Module features and sub-modules share one token segment.
            let mut children = HashSet::new();
            let child_names = module
                .features
                .iter()
                .map(|f| f.feature_name.as_str())
                .chain(module.sub_modules.iter().map(|s| s.sub_module_name.as_str()));
            for name in child_names {
                if !children.insert(checked_child(name)?) {
                    return Err(DomainError::InvalidCatalog(format!(
                        "duplicate feature or sub-module in {}: {}",
                        module.module_name, name
                    )));
                }
            }

            for sub in &module.sub_modules {
                let mut features = HashSet::new();
                for feature in &sub.features {
                    if !features.insert(checked_child(&feature.feature_name)?) {
                        return Err(DomainError::InvalidCatalog(format!(
                            "duplicate feature in {}/{}: {}",
                            module.module_name, sub.sub_module_name, feature.feature_name
                        )));
                    }
                }
            }
        }

        for rule in &self.implied_reads {
            let module = self.template.module(&rule.module).ok_or_else(|| {
                DomainError::InvalidCatalog(format!("implied read for unknown module: {}", rule.module))
            })?;
            if let Some(missing) = rule.sub_modules.iter().find(|s| module.sub_module(s).is_none()) {
                return Err(DomainError::InvalidCatalog(format!(
                    "implied read for unknown sub-module: {}/{}",
                    rule.module, missing
                )));
            }
        }

        Ok(())
    }

    /// The HR back-office catalog the role and user forms ship with.
    pub fn builtin() -> Self {
        use Action::*;

        let modules = vec![
            ModuleTemplate::new("Home", [Read]),
            ModuleTemplate::new("Jd", [Create, Read, Update, Delete, Upload, Approval]),
            ModuleTemplate::new("Hiring", [Read])
                .with_feature(FeatureTemplate::new("Cvpool", [Read]))
                .with_feature(FeatureTemplate::new("Interview", [Read, Create, Update]))
                .with_feature(FeatureTemplate::new("Offer", [Read, Create, Update, Approval]))
                .with_sub_module(SubModuleTemplate::new(
                    "Vacancy",
                    [Read, Create, Update, Delete],
                    vec![
                        FeatureTemplate::new("Candidate", [Read, Update]),
                        FeatureTemplate::new("Assessment", [Read, Create, Update]),
                    ],
                )),
            ModuleTemplate::new("College", [Read, Create, Update, Delete])
                .with_feature(FeatureTemplate::new("Coordinator", [Read, Create, Update, Delete]))
                .with_feature(FeatureTemplate::new("Campusdrive", [Read, Create, Update])),
            ModuleTemplate::new("Resignation", [Read, Create, Update, Approval]),
            ModuleTemplate::new("User", [Read, Create, Update, Delete])
                .with_feature(FeatureTemplate::new("Employee", [Read, Create, Update, Delete, Upload]))
                .with_feature(FeatureTemplate::new("Permission", [Read, Update])),
            ModuleTemplate::new("Role", [Read, Create, Update, Delete]),
            ModuleTemplate::new("System", [Read])
                .with_feature(FeatureTemplate::new("Setting", [Read, Update]))
                .with_feature(FeatureTemplate::new("Integration", [Read, Sync]))
                .with_sub_module(SubModuleTemplate::new(
                    "Xfactor",
                    [Read],
                    vec![
                        FeatureTemplate::new("Weightage", [Read, Update]),
                        FeatureTemplate::new("Parameter", [Read, Create, Update, Delete]),
                    ],
                )),
        ];

        let implied_reads = vec![
            ImpliedReadRule { module: "User".into(), sub_modules: vec![] },
            ImpliedReadRule { module: "Hiring".into(), sub_modules: vec!["Vacancy".into()] },
            ImpliedReadRule { module: "System".into(), sub_modules: vec!["Xfactor".into()] },
        ];

        Self { template: PermissionTemplate::new(modules), implied_reads }
    }
}

impl Default for PermissionCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn checked_segment(name: &str) -> Result<String, DomainError> {
    let segment = normalize_segment(name);
    if segment.is_empty() || !segment.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(DomainError::InvalidCatalog(format!(
            "name must be alphanumeric once lower-cased: {:?}",
            name
        )));
    }
    Ok(segment)
}

/// Feature and sub-module segments sit where an action may follow the parent,
/// so `prv_hiring_read` must never be both.
fn checked_child(name: &str) -> Result<String, DomainError> {
    let segment = checked_segment(name)?;
    if Action::from_str(&segment).is_some() {
        return Err(DomainError::InvalidCatalog(format!(
            "feature or sub-module name collides with an action: {}",
            name
        )));
    }
    Ok(segment)
}
