//! # Composite Rules
//!
//! A [`CompositeRule`] groups heterogeneous members under one catalog entry.
//! It answers to its own name, applies members in order and stops at the
//! first failure, and reports hardened only when every member is.

use hardn_core::{RuleTarget, Store};

use crate::error::RuleError;
use crate::rule::{Rule, RuleMeta, Session};

/// An ordered group of rules exposed as one rule.
#[derive(Debug)]
pub struct CompositeRule {
    meta: RuleMeta,
    members: Vec<Box<dyn Rule>>,
}

impl CompositeRule {
    /// Group `members` under `meta`.
    pub fn new(meta: RuleMeta, members: Vec<Box<dyn Rule>>) -> Self {
        Self { meta, members }
    }

    /// Append a member.
    pub fn push(&mut self, member: Box<dyn Rule>) {
        self.members.push(member);
    }

    /// Members in application order.
    pub fn members(&self) -> &[Box<dyn Rule>] {
        &self.members
    }
}

impl Rule for CompositeRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn apply(&self, session: &mut Session<'_>, enable: bool) -> Result<(), RuleError> {
        for member in &self.members {
            tracing::debug!(rule = %self.meta.name(), member = %member.name(), enable, "applying member");
            member.apply(session, enable)?;
        }
        Ok(())
    }

    fn is_hardened(&self, store: &dyn Store) -> bool {
        // Every member is checked even after one reports false.
        self.members
            .iter()
            .map(|member| member.is_hardened(store))
            .fold(true, |all, hardened| all & hardened)
    }

    fn targets(&self) -> Vec<RuleTarget> {
        self.members.iter().flat_map(|m| m.targets()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::Journal;
    use crate::single::SingleTargetRule;
    use hardn_core::{MemoryStore, RootScope};

    fn single(name: &str, value_name: &str) -> Box<dyn Rule> {
        Box::new(SingleTargetRule::new(
            RuleMeta::named(name).unwrap(),
            RuleTarget::new(RootScope::CurrentUser, "App\\Options", value_name).unwrap(),
            1,
        ))
    }

    #[test]
    fn name_is_the_composite_name() {
        let group = CompositeRule::new(
            RuleMeta::named("OfficeDDE").unwrap().with_long_name("Office DDE Links"),
            vec![single("Member", "A")],
        );
        assert_eq!(group.name(), "OfficeDDE");
        assert_eq!(group.long_name(), "Office DDE Links");
    }

    #[test]
    fn nested_composites_flatten_targets() {
        let inner = CompositeRule::new(
            RuleMeta::named("Inner").unwrap(),
            vec![single("B", "B"), single("C", "C")],
        );
        let mut outer = CompositeRule::new(RuleMeta::named("Outer").unwrap(), vec![single("A", "A")]);
        outer.push(Box::new(inner));

        let names: Vec<String> = outer
            .targets()
            .iter()
            .map(|t| t.value_name().to_string())
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(outer.members().len(), 2);
    }

    #[test]
    fn harden_and_restore_every_member() {
        let group = CompositeRule::new(
            RuleMeta::named("Group").unwrap(),
            vec![single("A", "A"), single("B", "B")],
        );
        let store = MemoryStore::new();
        let mut journal = Journal::new();

        let mut session = Session::new(&store, &mut journal);
        session.harden(&group).unwrap();
        assert!(group.is_hardened(&store));
        assert_eq!(store.len(), 2);

        session.restore(&group).unwrap();
        assert!(!group.is_hardened(&store));
        assert!(store.is_empty());
    }

    #[test]
    fn empty_composite_is_vacuously_hardened() {
        let group = CompositeRule::new(RuleMeta::named("Empty").unwrap(), Vec::new());
        assert!(group.is_hardened(&MemoryStore::new()));
        assert!(group.targets().is_empty());
    }
}
