// ============================================================================
// HRM Core - Permission Matrix
// File: crates/hrm-core/src/permission/matrix.rs
// Description: Toggle and bulk-select operations over a PermissionState
// ============================================================================

use std::sync::Arc;
use tracing::debug;

use super::change::MatrixChange;
use super::codec;
use crate::domain::{
    Action, ActionSet, NodePath, NodeTarget, PermissionCatalog, PermissionState,
    PermissionTemplate, Scope, SelectionState,
};

/// Selection state for one role or user, bound to the catalog it was built
/// from. The state is only reachable through methods that keep it shaped like
/// the template and within each node's allowed actions.
#[derive(Debug, Clone)]
pub struct PermissionMatrix {
    catalog: Arc<PermissionCatalog>,
    state: PermissionState,
}

fn position<T>(items: &[T], name: &str, key: impl Fn(&T) -> &str) -> Option<usize> {
    items.iter().position(|item| key(item).eq_ignore_ascii_case(name))
}

/// Resolve a path to the node's (allowed, selected) pair.
fn node_mut<'a>(
    template: &'a PermissionTemplate,
    state: &'a mut PermissionState,
    path: &NodePath,
) -> Option<(&'a ActionSet, &'a mut ActionSet)> {
    let mi = position(&template.modules, &path.module, |m| m.module_name.as_str())?;
    let mt = &template.modules[mi];
    let ms = state.modules.get_mut(mi)?;

    match &path.target {
        NodeTarget::Direct => Some((&mt.direct_actions, &mut ms.selected_direct_actions)),
        NodeTarget::Feature { feature } => {
            let fi = position(&mt.features, feature, |f| f.feature_name.as_str())?;
            let fs = ms.features.get_mut(fi)?;
            Some((&mt.features[fi].allowed_actions, &mut fs.selected_actions))
        }
        NodeTarget::SubModuleDirect { sub_module } => {
            let si = position(&mt.sub_modules, sub_module, |s| s.sub_module_name.as_str())?;
            let ss = ms.sub_modules.get_mut(si)?;
            Some((&mt.sub_modules[si].direct_actions, &mut ss.selected_direct_actions))
        }
        NodeTarget::SubModuleFeature { sub_module, feature } => {
            let si = position(&mt.sub_modules, sub_module, |s| s.sub_module_name.as_str())?;
            let st = &mt.sub_modules[si];
            let fi = position(&st.features, feature, |f| f.feature_name.as_str())?;
            let fs = ms.sub_modules.get_mut(si)?.features.get_mut(fi)?;
            Some((&st.features[fi].allowed_actions, &mut fs.selected_actions))
        }
    }
}

impl PermissionMatrix {
    /// Empty matrix for a new role or user.
    pub fn new(catalog: Arc<PermissionCatalog>) -> Self {
        let state = PermissionState::empty(&catalog.template);
        Self { catalog, state }
    }

    /// Matrix for an existing role or user from its persisted tokens.
    pub fn from_tokens<I, S>(catalog: Arc<PermissionCatalog>, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let state = codec::decode(tokens, &catalog.template);
        Self { catalog, state }
    }

    pub fn template(&self) -> &PermissionTemplate {
        &self.catalog.template
    }

    pub fn state(&self) -> &PermissionState {
        &self.state
    }

    /// Add or remove one action at a node. Returns `false` without touching
    /// the state when the path is unknown or the action is not allowed there.
    pub fn set_action(&mut self, path: &NodePath, action: Action, selected: bool) -> bool {
        let Some((allowed, current)) = node_mut(&self.catalog.template, &mut self.state, path) else {
            debug!(module = %path.module, target = ?path.target, "Ignoring unknown permission path");
            return false;
        };

        if !allowed.contains(&action) {
            debug!(module = %path.module, %action, "Ignoring action not allowed at node");
            return false;
        }

        if selected {
            current.insert(action);
        } else {
            current.remove(&action);
        }
        true
    }

    /// Select every allowed action of a node, or clear it.
    pub fn set_all_actions_for_node(&mut self, path: &NodePath, selected: bool) -> bool {
        let Some((allowed, current)) = node_mut(&self.catalog.template, &mut self.state, path) else {
            debug!(module = %path.module, target = ?path.target, "Ignoring unknown permission path");
            return false;
        };

        *current = if selected { allowed.clone() } else { ActionSet::new() };
        true
    }

    /// Cascade a full select or clear over a module's whole subtree.
    pub fn set_all_for_module(&mut self, module: &str, selected: bool) -> bool {
        let template = &self.catalog.template;
        let Some(mi) = position(&template.modules, module, |m| m.module_name.as_str()) else {
            debug!(module, "Ignoring unknown permission module");
            return false;
        };

        match self.state.modules.get_mut(mi) {
            Some(state) => {
                *state = crate::domain::ModuleState::from_template(&template.modules[mi], selected);
                true
            }
            None => false,
        }
    }

    /// Rebuild the whole state from the template, all selected or all clear.
    pub fn set_all_modules(&mut self, selected: bool) {
        self.state = PermissionState::from_template(&self.catalog.template, selected);
    }

    pub fn apply(&mut self, change: &MatrixChange) -> bool {
        match change {
            MatrixChange::SetAction { path, action, selected } => {
                self.set_action(path, *action, *selected)
            }
            MatrixChange::SetAllActionsForNode { path, selected } => {
                self.set_all_actions_for_node(path, *selected)
            }
            MatrixChange::SetAllForModule { module, selected } => {
                self.set_all_for_module(module, *selected)
            }
            MatrixChange::SetAllModules { selected } => {
                self.set_all_modules(*selected);
                true
            }
        }
    }

    /// Allowed actions at a node, if the path exists.
    pub fn allowed_actions(&self, path: &NodePath) -> Option<&ActionSet> {
        self.counts_node(path).map(|(allowed, _)| allowed)
    }

    /// Selected actions at a node, if the path exists.
    pub fn selected_actions(&self, path: &NodePath) -> Option<&ActionSet> {
        self.counts_node(path).map(|(_, selected)| selected)
    }

    fn counts_node(&self, path: &NodePath) -> Option<(&ActionSet, &ActionSet)> {
        let template = &self.catalog.template;
        let mi = position(&template.modules, &path.module, |m| m.module_name.as_str())?;
        let mt = &template.modules[mi];
        let ms = self.state.modules.get(mi)?;

        match &path.target {
            NodeTarget::Direct => Some((&mt.direct_actions, &ms.selected_direct_actions)),
            NodeTarget::Feature { feature } => {
                let fi = position(&mt.features, feature, |f| f.feature_name.as_str())?;
                Some((&mt.features[fi].allowed_actions, &ms.features.get(fi)?.selected_actions))
            }
            NodeTarget::SubModuleDirect { sub_module } => {
                let si = position(&mt.sub_modules, sub_module, |s| s.sub_module_name.as_str())?;
                Some((&mt.sub_modules[si].direct_actions, &ms.sub_modules.get(si)?.selected_direct_actions))
            }
            NodeTarget::SubModuleFeature { sub_module, feature } => {
                let si = position(&mt.sub_modules, sub_module, |s| s.sub_module_name.as_str())?;
                let st = &mt.sub_modules[si];
                let fi = position(&st.features, feature, |f| f.feature_name.as_str())?;
                let fs = ms.sub_modules.get(si)?.features.get(fi)?;
                Some((&st.features[fi].allowed_actions, &fs.selected_actions))
            }
        }
    }

    /// (selected, allowed) action counts under a scope.
    fn counts(&self, scope: &Scope) -> Option<(usize, usize)> {
        let template = &self.catalog.template;
        match scope {
            Scope::All => Some((self.state.selected_count(), template.allowed_count())),
            Scope::Module { module } => {
                let mi = position(&template.modules, module, |m| m.module_name.as_str())?;
                let ms = self.state.modules.get(mi)?;
                Some((ms.selected_count(), template.modules[mi].allowed_count()))
            }
            Scope::SubModule { module, sub_module } => {
                let mi = position(&template.modules, module, |m| m.module_name.as_str())?;
                let mt = &template.modules[mi];
                let si = position(&mt.sub_modules, sub_module, |s| s.sub_module_name.as_str())?;
                let ss = self.state.modules.get(mi)?.sub_modules.get(si)?;
                Some((ss.selected_count(), mt.sub_modules[si].allowed_count()))
            }
            Scope::Node { path } => self
                .counts_node(path)
                .map(|(allowed, selected)| (selected.len(), allowed.len())),
        }
    }

    /// Tri-state of a scope; unknown scopes read as empty.
    pub fn selection(&self, scope: &Scope) -> SelectionState {
        self.counts(scope)
            .map(|(selected, allowed)| SelectionState::from_counts(selected, allowed))
            .unwrap_or(SelectionState::Empty)
    }

    /// Every allowed action under the scope is selected.
    pub fn is_fully_selected(&self, scope: &Scope) -> bool {
        self.counts(scope)
            .is_some_and(|(selected, allowed)| selected == allowed)
    }

    /// Encode the current state, implied read grants included.
    pub fn to_tokens(&self) -> Vec<String> {
        codec::encode(&self.state, &self.catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeatureTemplate, ModuleTemplate, SubModuleTemplate};
    use std::collections::BTreeSet;

    fn catalog() -> Arc<PermissionCatalog> {
        Arc::new(PermissionCatalog::builtin())
    }

    fn tokens(matrix: &PermissionMatrix) -> BTreeSet<String> {
        matrix.to_tokens().into_iter().collect()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// Every node path the builtin catalog exposes, with its allowed actions.
    fn all_paths(template: &PermissionTemplate) -> Vec<(NodePath, ActionSet)> {
        let mut out = Vec::new();
        for m in &template.modules {
            out.push((NodePath::direct(&m.module_name), m.direct_actions.clone()));
            for f in &m.features {
                out.push((NodePath::feature(&m.module_name, &f.feature_name), f.allowed_actions.clone()));
            }
            for s in &m.sub_modules {
                out.push((
                    NodePath::sub_module_direct(&m.module_name, &s.sub_module_name),
                    s.direct_actions.clone(),
                ));
                for f in &s.features {
                    out.push((
                        NodePath::sub_module_feature(&m.module_name, &s.sub_module_name, &f.feature_name),
                        f.allowed_actions.clone(),
                    ));
                }
            }
        }
        out
    }

    #[test]
    fn test_jd_direct_read_scenario() {
        let mut matrix = PermissionMatrix::new(catalog());
        assert!(matrix.set_action(&NodePath::direct("Jd"), Action::Read, true));
        assert_eq!(tokens(&matrix), set(&["prv_jd_read"]));
    }

    #[test]
    fn test_hiring_cvpool_implies_module_read() {
        let mut matrix = PermissionMatrix::new(catalog());
        assert!(matrix.set_action(&NodePath::feature("Hiring", "Cvpool"), Action::Read, true));
        assert_eq!(tokens(&matrix), set(&["prv_hiring_cvpool_read", "prv_hiring_read"]));
    }

    #[test]
    fn test_decode_home_scenario() {
        let matrix = PermissionMatrix::from_tokens(catalog(), ["prv_home_read"]);
        assert_eq!(
            matrix.selected_actions(&NodePath::direct("Home")),
            Some(&[Action::Read].into_iter().collect())
        );
        assert_eq!(matrix.state().selected_count(), 1);
    }

    #[test]
    fn test_select_all_and_clear_all_modules() {
        let catalog = catalog();
        let mut matrix = PermissionMatrix::new(catalog.clone());
        matrix.set_all_modules(true);

        let mut expected = BTreeSet::new();
        for (path, allowed) in all_paths(&catalog.template) {
            let mut segments = vec![path.module.as_str()];
            match &path.target {
                NodeTarget::Direct => {}
                NodeTarget::Feature { feature } => segments.push(feature),
                NodeTarget::SubModuleDirect { sub_module } => segments.push(sub_module),
                NodeTarget::SubModuleFeature { sub_module, feature } => {
                    segments.push(sub_module);
                    segments.push(feature);
                }
            }
            for action in allowed {
                expected.insert(codec::token(&segments, action));
            }
        }
        expected.extend(set(&[
            "prv_user_read",
            "prv_hiring_read",
            "prv_hiring_vacancy_read",
            "prv_system_read",
            "prv_system_xfactor_read",
        ]));
        assert_eq!(tokens(&matrix), expected);
        assert!(matrix.is_fully_selected(&Scope::All));

        matrix.set_all_modules(false);
        assert!(matrix.to_tokens().is_empty());
        assert_eq!(matrix.selection(&Scope::All), SelectionState::Empty);
    }

    #[test]
    fn test_disallowed_action_is_ignored() {
        let mut matrix = PermissionMatrix::new(catalog());
        assert!(!matrix.set_action(&NodePath::direct("Home"), Action::Delete, true));
        assert!(!matrix.set_action(&NodePath::feature("Hiring", "Cvpool"), Action::Sync, true));
        assert_eq!(matrix.state().selected_count(), 0);
        assert!(matrix.state().conforms_to(matrix.template()));
    }

    #[test]
    fn test_unknown_paths_are_ignored() {
        let mut matrix = PermissionMatrix::new(catalog());
        let before = matrix.state().clone();
        assert!(!matrix.set_action(&NodePath::direct("Payroll"), Action::Read, true));
        assert!(!matrix.set_action(&NodePath::feature("Hiring", "Vacancy"), Action::Read, true));
        assert!(!matrix.set_all_actions_for_node(&NodePath::sub_module_direct("Hiring", "Cvpool"), true));
        assert!(!matrix.set_all_actions_for_node(
            &NodePath::sub_module_feature("System", "Xfactor", "Nope"),
            true
        ));
        assert!(!matrix.set_all_for_module("Payroll", true));
        assert_eq!(matrix.state(), &before);
    }

    #[test]
    fn test_path_lookup_ignores_case() {
        let mut matrix = PermissionMatrix::new(catalog());
        assert!(matrix.set_action(
            &NodePath::sub_module_feature("hiring", "VACANCY", "candidate"),
            Action::Update,
            true
        ));
        assert!(tokens(&matrix).contains("prv_hiring_vacancy_candidate_update"));
    }

    #[test]
    fn test_toggle_off_single_action() {
        let mut matrix = PermissionMatrix::new(catalog());
        let path = NodePath::direct("Resignation");
        matrix.set_action(&path, Action::Approval, true);
        matrix.set_action(&path, Action::Read, true);
        matrix.set_action(&path, Action::Approval, false);
        assert_eq!(tokens(&matrix), set(&["prv_resignation_read"]));
    }

    #[test]
    fn test_set_all_actions_for_node() {
        let mut matrix = PermissionMatrix::new(catalog());
        let path = NodePath::feature("College", "Campusdrive");
        assert!(matrix.set_all_actions_for_node(&path, true));
        assert_eq!(matrix.selected_actions(&path), matrix.allowed_actions(&path));
        assert!(matrix.is_fully_selected(&Scope::Node { path: path.clone() }));
        assert_eq!(
            matrix.selection(&Scope::Module { module: "College".into() }),
            SelectionState::Partial
        );

        assert!(matrix.set_all_actions_for_node(&path, false));
        assert!(matrix.selected_actions(&path).unwrap().is_empty());
    }

    #[test]
    fn test_module_select_all_is_idempotent() {
        let mut once = PermissionMatrix::new(catalog());
        once.set_all_for_module("Hiring", true);
        let mut twice = once.clone();
        twice.set_all_for_module("Hiring", true);
        assert_eq!(once.state(), twice.state());

        once.set_all_for_module("Hiring", false);
        let mut cleared_twice = once.clone();
        cleared_twice.set_all_for_module("Hiring", false);
        assert_eq!(once.state(), cleared_twice.state());
    }

    #[test]
    fn test_module_toggle_round_trip_clears_subtree() {
        let mut matrix = PermissionMatrix::new(catalog());
        matrix.set_action(&NodePath::direct("Jd"), Action::Upload, true);
        matrix.set_action(&NodePath::feature("Hiring", "Offer"), Action::Approval, true);

        matrix.set_all_for_module("Hiring", true);
        assert!(matrix.is_fully_selected(&Scope::Module { module: "Hiring".into() }));
        assert!(matrix.is_fully_selected(&Scope::SubModule {
            module: "Hiring".into(),
            sub_module: "Vacancy".into()
        }));

        matrix.set_all_for_module("Hiring", false);
        assert_eq!(
            matrix.selection(&Scope::Module { module: "Hiring".into() }),
            SelectionState::Empty
        );
        // Partial selections elsewhere survive; the Hiring partial state does not come back.
        assert_eq!(tokens(&matrix), set(&["prv_jd_upload"]));
    }

    #[test]
    fn test_module_fully_selected_requires_children() {
        let mut matrix = PermissionMatrix::new(catalog());
        matrix.set_all_actions_for_node(&NodePath::direct("System"), true);
        matrix.set_all_actions_for_node(&NodePath::feature("System", "Setting"), true);
        matrix.set_all_actions_for_node(&NodePath::feature("System", "Integration"), true);
        matrix.set_all_actions_for_node(&NodePath::sub_module_direct("System", "Xfactor"), true);
        let module = Scope::Module { module: "System".into() };
        assert!(!matrix.is_fully_selected(&module));
        assert_eq!(matrix.selection(&module), SelectionState::Partial);

        matrix.set_all_actions_for_node(&NodePath::sub_module_feature("System", "Xfactor", "Weightage"), true);
        matrix.set_all_actions_for_node(&NodePath::sub_module_feature("System", "Xfactor", "Parameter"), true);
        assert!(matrix.is_fully_selected(&module));
    }

    #[test]
    fn test_unknown_scope_reads_empty() {
        let matrix = PermissionMatrix::new(catalog());
        let scope = Scope::Module { module: "Payroll".into() };
        assert_eq!(matrix.selection(&scope), SelectionState::Empty);
        assert!(!matrix.is_fully_selected(&scope));
    }

    #[test]
    fn test_implied_tokens_per_module() {
        let catalog = catalog();

        let mut user = PermissionMatrix::new(catalog.clone());
        user.set_action(&NodePath::feature("User", "Employee"), Action::Upload, true);
        assert_eq!(tokens(&user), set(&["prv_user_employee_upload", "prv_user_read"]));

        let mut vacancy = PermissionMatrix::new(catalog.clone());
        vacancy.set_action(&NodePath::sub_module_feature("Hiring", "Vacancy", "Assessment"), Action::Create, true);
        assert_eq!(
            tokens(&vacancy),
            set(&["prv_hiring_vacancy_assessment_create", "prv_hiring_read", "prv_hiring_vacancy_read"])
        );

        let mut system = PermissionMatrix::new(catalog.clone());
        system.set_action(&NodePath::feature("System", "Integration"), Action::Sync, true);
        assert_eq!(tokens(&system), set(&["prv_system_integration_sync", "prv_system_read"]));

        let mut xfactor = PermissionMatrix::new(catalog);
        xfactor.set_action(&NodePath::sub_module_feature("System", "Xfactor", "Weightage"), Action::Update, true);
        assert_eq!(
            tokens(&xfactor),
            set(&["prv_system_xfactor_weightage_update", "prv_system_read", "prv_system_xfactor_read"])
        );
    }

    #[test]
    fn test_direct_selection_does_not_imply() {
        let mut matrix = PermissionMatrix::new(catalog());
        matrix.set_action(&NodePath::sub_module_direct("Hiring", "Vacancy"), Action::Create, true);
        assert_eq!(tokens(&matrix), set(&["prv_hiring_vacancy_create"]));
    }

    #[test]
    fn test_round_trip_outside_implied_modules() {
        let catalog = catalog();
        let mut matrix = PermissionMatrix::new(catalog.clone());
        matrix.set_action(&NodePath::direct("Jd"), Action::Approval, true);
        matrix.set_action(&NodePath::direct("Jd"), Action::Create, true);
        matrix.set_action(&NodePath::feature("College", "Coordinator"), Action::Delete, true);
        matrix.set_action(&NodePath::direct("Role"), Action::Update, true);
        matrix.set_action(&NodePath::direct("Home"), Action::Read, true);

        let decoded = PermissionMatrix::from_tokens(catalog, matrix.to_tokens());
        assert_eq!(decoded.state(), matrix.state());
    }

    #[test]
    fn test_round_trip_every_single_action() {
        let catalog = catalog();
        let implied = ["User", "Hiring", "System"];
        for (path, allowed) in all_paths(&catalog.template) {
            if implied.contains(&path.module.as_str()) {
                continue;
            }
            for action in allowed {
                let mut matrix = PermissionMatrix::new(catalog.clone());
                assert!(matrix.set_action(&path, action, true));
                let decoded = PermissionMatrix::from_tokens(catalog.clone(), matrix.to_tokens());
                assert_eq!(decoded.state(), matrix.state(), "{:?} {}", path, action);
            }
        }
    }

    #[test]
    fn test_shape_and_subset_hold_across_operations() {
        let catalog = catalog();
        let mut matrix = PermissionMatrix::new(catalog.clone());
        let paths = all_paths(&catalog.template);

        // Deterministic walk over every operation kind, including invalid inputs.
        for (i, (path, _)) in paths.iter().enumerate() {
            let action = Action::ALL[i % Action::ALL.len()];
            matrix.set_action(path, action, i % 3 != 0);
            if i % 4 == 0 {
                matrix.set_all_actions_for_node(path, i % 8 == 0);
            }
            if i % 5 == 0 {
                matrix.set_all_for_module(&path.module, i % 10 == 0);
            }
            if i % 11 == 0 {
                matrix.set_all_modules(i % 22 == 0);
            }
            matrix.set_action(&NodePath::feature(&path.module, "Nope"), action, true);
            assert!(matrix.state().conforms_to(&catalog.template));
        }
    }

    #[test]
    fn test_apply_changes() {
        let mut matrix = PermissionMatrix::new(catalog());
        let changes = vec![
            MatrixChange::SetAllModules { selected: true },
            MatrixChange::SetAllForModule { module: "Hiring".into(), selected: false },
            MatrixChange::SetAllActionsForNode { path: NodePath::direct("Jd"), selected: false },
            MatrixChange::SetAction { path: NodePath::direct("Jd"), action: Action::Read, selected: true },
        ];
        for change in &changes {
            assert!(matrix.apply(change));
        }
        assert!(matrix.is_fully_selected(&Scope::Module { module: "College".into() }));
        assert_eq!(
            matrix.selection(&Scope::Module { module: "Hiring".into() }),
            SelectionState::Empty
        );
        assert_eq!(
            matrix.selection(&Scope::Node { path: NodePath::direct("Jd") }),
            SelectionState::Partial
        );
    }

    #[test]
    fn test_module_without_actions_is_vacuously_full() {
        let template = PermissionTemplate::new(vec![
            ModuleTemplate::new("Reports", ActionSet::new())
                .with_sub_module(SubModuleTemplate::new("Monthly", ActionSet::new(), vec![]))
                .with_feature(FeatureTemplate::new("Export", [Action::Read])),
        ]);
        let catalog = Arc::new(PermissionCatalog::new(template, vec![]).unwrap());
        let matrix = PermissionMatrix::new(catalog);
        assert!(matrix.is_fully_selected(&Scope::SubModule {
            module: "Reports".into(),
            sub_module: "Monthly".into()
        }));
        assert!(!matrix.is_fully_selected(&Scope::Module { module: "Reports".into() }));
    }
}
