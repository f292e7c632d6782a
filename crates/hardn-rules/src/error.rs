//! Rule execution errors.

use hardn_core::{RuleName, RuleTarget, StoreError};
use thiserror::Error;

/// Failure while applying or restoring a rule.
///
/// Raised by [`SingleTargetRule`](crate::SingleTargetRule) and passed through
/// templates and composites unchanged.
#[derive(Error, Debug)]
pub enum RuleError {
    /// The store refused a read or write.
    #[error("rule {rule} failed at {}", .source.target())]
    Store {
        /// Short name of the rule that issued the store call.
        rule: RuleName,
        /// The store failure, carrying the concrete target.
        source: StoreError,
    },
}

impl RuleError {
    /// Short name of the failing rule.
    pub fn rule(&self) -> &RuleName {
        match self {
            Self::Store { rule, .. } => rule,
        }
    }

    /// The concrete target that failed.
    pub fn target(&self) -> &RuleTarget {
        match self {
            Self::Store { source, .. } => source.target(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hardn_core::RootScope;

    #[test]
    fn display_names_rule_and_target() {
        let target = RuleTarget::new(RootScope::CurrentUser, "K\\Security", "VBAWarnings").unwrap();
        let err = RuleError::Store {
            rule: RuleName::new("OfficeMacros").unwrap(),
            source: StoreError::Access {
                target,
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("OfficeMacros"));
        assert!(msg.contains("VBAWarnings"));
        assert_eq!(err.rule().as_str(), "OfficeMacros");
        assert_eq!(err.target().path(), "K\\Security");
    }
}
