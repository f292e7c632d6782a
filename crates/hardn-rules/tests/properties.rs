//! Property tests for template expansion and single-target round trips.

use hardn_core::{MemoryStore, RootScope, RuleTarget, Store};
use hardn_rules::{
    Dimension, Journal, PathTemplate, Rule, RuleMeta, Session, SingleTargetRule,
    TemplateExpansionRule,
};
use proptest::prelude::*;

fn vocabulary() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set("[A-Za-z0-9.]{1,8}", 1..5).prop_map(|set| set.into_iter().collect())
}

fn target() -> RuleTarget {
    RuleTarget::new(RootScope::CurrentUser, "App\\Security", "FeatureFlag").unwrap()
}

proptest! {
    /// Expansion yields |A| x |B| targets, outer loop A, inner loop B, every time.
    #[test]
    fn expansion_is_cross_product_in_order(a in vocabulary(), b in vocabulary()) {
        let rule = TemplateExpansionRule::new(
            RuleMeta::named("Prop").unwrap(),
            RootScope::CurrentUser,
            PathTemplate::new("Root\\{}\\{}").unwrap(),
            Dimension::new("a", a.clone()).unwrap(),
            Dimension::new("b", b.clone()).unwrap(),
            "Value",
            1,
        ).unwrap();

        let expected: Vec<String> = a
            .iter()
            .flat_map(|x| b.iter().map(move |y| format!("Root\\{x}\\{y}")))
            .collect();
        let first: Vec<String> = rule.targets().iter().map(|t| t.path().to_string()).collect();
        let second: Vec<String> = rule.targets().iter().map(|t| t.path().to_string()).collect();

        prop_assert_eq!(first.len(), a.len() * b.len());
        prop_assert_eq!(&first, &expected);
        prop_assert_eq!(first, second);
    }

    /// Harden then restore returns any prior value (or absence) exactly.
    #[test]
    fn round_trip_preserves_prior_state(prior in proptest::option::of(any::<u32>()), hardened in any::<u32>()) {
        let store = match prior {
            Some(v) => MemoryStore::with_values([(target(), v)]),
            None => MemoryStore::new(),
        };
        let rule = SingleTargetRule::new(RuleMeta::named("FeatureFlag").unwrap(), target(), hardened);
        let mut journal = Journal::new();

        let mut session = Session::new(&store, &mut journal);
        session.harden(&rule).unwrap();
        prop_assert!(rule.is_hardened(&store));
        session.harden(&rule).unwrap();
        session.restore(&rule).unwrap();

        prop_assert_eq!(store.get_value(&target()).ok(), prior);
        prop_assert!(journal.is_empty());
    }
}
