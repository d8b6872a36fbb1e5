// ============================================================================
// HRM Core - Permission Token Codec
// File: crates/hrm-core/src/permission/codec.rs
// Description: PermissionState <-> flat `prv_...` token list
// ============================================================================
//! Token format: `prv_{module}[_{sub_module}][_{feature}]_{action}`, every
//! segment lower-cased with whitespace removed.

use std::collections::HashSet;
use tracing::debug;

use hrm_shared::constants::{TOKEN_PREFIX, TOKEN_SEPARATOR};

use crate::domain::{
    Action, ActionSet, FeatureState, FeatureTemplate, ModuleState, ModuleTemplate,
    PermissionCatalog, PermissionState, PermissionTemplate, SubModuleState,
};

/// Lower-case a catalog name and drop whitespace so it can be a token segment.
pub fn normalize_segment(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Build the token for `action` under the given path segments.
pub fn token(segments: &[&str], action: Action) -> String {
    let mut out = String::from(TOKEN_PREFIX);
    for segment in segments {
        out.push(TOKEN_SEPARATOR);
        out.push_str(&normalize_segment(segment));
    }
    out.push(TOKEN_SEPARATOR);
    out.push_str(action.as_str());
    out
}

/// Ordered token list with duplicates removed, first occurrence wins.
#[derive(Default)]
struct TokenList {
    seen: HashSet<String>,
    tokens: Vec<String>,
}

impl TokenList {
    fn push(&mut self, token: String) {
        if self.seen.insert(token.clone()) {
            self.tokens.push(token);
        }
    }

    fn extend(&mut self, segments: &[&str], actions: &ActionSet) {
        for action in actions {
            self.push(token(segments, *action));
        }
    }
}

/// Encode every selected action, then the catalog's implied read grants.
///
/// Output order is template order followed by implied tokens, so the same
/// state always yields the same list.
pub fn encode(state: &PermissionState, catalog: &PermissionCatalog) -> Vec<String> {
    let mut list = TokenList::default();

    for module in &state.modules {
        let m = module.module_name.as_str();
        list.extend(&[m], &module.selected_direct_actions);
        for feature in &module.features {
            list.extend(&[m, feature.feature_name.as_str()], &feature.selected_actions);
        }
        for sub in &module.sub_modules {
            let s = sub.sub_module_name.as_str();
            list.extend(&[m, s], &sub.selected_direct_actions);
            for feature in &sub.features {
                list.extend(&[m, s, feature.feature_name.as_str()], &feature.selected_actions);
            }
        }
    }

    for token in implied_tokens(state, catalog) {
        list.push(token);
    }

    list.tokens
}

/// Read grants implied by feature selections, per the catalog's rules.
pub fn implied_tokens(state: &PermissionState, catalog: &PermissionCatalog) -> Vec<String> {
    let mut out = Vec::new();

    for rule in &catalog.implied_reads {
        let Some(module) = find_module(state, &rule.module) else {
            continue;
        };

        let sub_grants: Vec<String> = rule
            .sub_modules
            .iter()
            .filter_map(|name| {
                module
                    .sub_modules
                    .iter()
                    .find(|s| s.sub_module_name.eq_ignore_ascii_case(name))
            })
            .filter(|sub| sub.has_feature_selection())
            .map(|sub| token(&[module.module_name.as_str(), sub.sub_module_name.as_str()], Action::Read))
            .collect();

        if module.has_feature_selection() || !sub_grants.is_empty() {
            out.push(token(&[module.module_name.as_str()], Action::Read));
        }
        out.extend(sub_grants);
    }

    out
}

fn find_module<'a>(state: &'a PermissionState, name: &str) -> Option<&'a ModuleState> {
    state
        .modules
        .iter()
        .find(|m| m.module_name.eq_ignore_ascii_case(name))
}

/// Token lookup shared by one `decode` call.
struct Decoder {
    present: HashSet<String>,
    matched: usize,
}

impl Decoder {
    fn pick(&mut self, segments: &[&str], allowed: &ActionSet) -> ActionSet {
        let selected: ActionSet = allowed
            .iter()
            .copied()
            .filter(|action| self.present.contains(&token(segments, *action)))
            .collect();
        self.matched += selected.len();
        selected
    }

    fn features(&mut self, prefix: &[&str], features: &[FeatureTemplate]) -> Vec<FeatureState> {
        features
            .iter()
            .map(|f| {
                let mut segments = prefix.to_vec();
                segments.push(f.feature_name.as_str());
                FeatureState {
                    feature_name: f.feature_name.clone(),
                    selected_actions: self.pick(&segments, &f.allowed_actions),
                }
            })
            .collect()
    }

    fn module(&mut self, mt: &ModuleTemplate) -> ModuleState {
        let m = mt.module_name.as_str();
        ModuleState {
            module_name: mt.module_name.clone(),
            selected_direct_actions: self.pick(&[m], &mt.direct_actions),
            features: self.features(&[m], &mt.features),
            sub_modules: mt
                .sub_modules
                .iter()
                .map(|st| {
                    let s = st.sub_module_name.as_str();
                    SubModuleState {
                        sub_module_name: st.sub_module_name.clone(),
                        selected_direct_actions: self.pick(&[m, s], &st.direct_actions),
                        features: self.features(&[m, s], &st.features),
                    }
                })
                .collect(),
        }
    }
}

/// Rebuild a state from tokens. A node action is selected iff its exact token
/// is present; anything else in `tokens` is ignored.
pub fn decode<I, S>(tokens: I, template: &PermissionTemplate) -> PermissionState
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let present: HashSet<String> = tokens
        .into_iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    let mut decoder = Decoder { present, matched: 0 };
    let modules = template.modules.iter().map(|mt| decoder.module(mt)).collect();

    let ignored = decoder.present.len().saturating_sub(decoder.matched);
    if ignored > 0 {
        debug!(ignored, "Dropped permission tokens with no matching catalog path");
    }

    PermissionState { modules }
}
