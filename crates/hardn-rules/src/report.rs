//! Status reports for rules, as printed by `hardn status` and `hardn list`.

use hardn_core::{Dword, RuleTarget, Store};
use serde::Serialize;

use crate::rule::Rule;

/// Observed state of one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetReport {
    /// The target.
    pub target: RuleTarget,
    /// The value currently held, `None` when absent or unreadable.
    pub current: Option<Dword>,
}

/// Observed state of one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleReport {
    /// Short name.
    pub name: String,
    /// Human label.
    pub long_name: String,
    /// Prose description.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Result of [`Rule::is_hardened`].
    pub hardened: bool,
    /// Every concrete target with its current value.
    pub targets: Vec<TargetReport>,
}

impl RuleReport {
    /// Read every target of `rule` from `store`. Read-only.
    pub fn inspect(rule: &dyn Rule, store: &dyn Store) -> Self {
        let targets = rule
            .targets()
            .into_iter()
            .map(|target| {
                let current = store.get_value(&target).ok();
                TargetReport { target, current }
            })
            .collect();
        Self {
            name: rule.name().to_string(),
            long_name: rule.long_name().to_string(),
            description: rule.description().to_string(),
            hardened: rule.is_hardened(store),
            targets,
        }
    }

    /// Number of targets currently holding any value.
    pub fn present_count(&self) -> usize {
        self.targets.iter().filter(|t| t.current.is_some()).count()
    }
}
