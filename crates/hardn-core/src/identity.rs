//! # Rule Identifiers
//!
//! A [`RuleName`] is the stable machine key of a rule: it selects rules on the
//! command line, keys journal entries, and must be unique across a catalog.
//! The format is validated at construction so that a typo in a catalog file
//! fails at load time rather than silently never matching.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

const MAX_RULE_NAME_LEN: usize = 64;

/// Validated short name of a rule.
///
/// Format: 1 to 64 characters drawn from ASCII letters, digits, `_`, `-`, `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RuleName(String);

impl RuleName {
    /// Create a rule name, validating its format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRuleName`] if the name is empty, too
    /// long, or contains characters outside `[A-Za-z0-9_.-]`.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        let valid = !s.is_empty()
            && s.len() <= MAX_RULE_NAME_LEN
            && s
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if valid {
            Ok(Self(s))
        } else {
            Err(ValidationError::InvalidRuleName(s))
        }
    }

    /// Access the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison, used when matching operator input.
    pub fn matches(&self, input: &str) -> bool {
        self.0.eq_ignore_ascii_case(input)
    }
}

impl TryFrom<String> for RuleName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RuleName> for String {
    fn from(name: RuleName) -> Self {
        name.0
    }
}

impl std::fmt::Display for RuleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RuleName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_catalog_style_names() {
        for name in ["OfficeOLE", "OfficeDDE_DontUpdateLinksWordExcel", "a-b.c"] {
            assert!(RuleName::new(name).is_ok(), "{name} should be valid");
        }
    }

    #[test]
    fn rejects_empty_name() {
        assert_eq!(
            RuleName::new(""),
            Err(ValidationError::InvalidRuleName(String::new()))
        );
    }

    #[test]
    fn rejects_whitespace_and_separators() {
        assert!(RuleName::new("Office Macros").is_err());
        assert!(RuleName::new("Office\\Macros").is_err());
    }

    #[test]
    fn rejects_overlong_name() {
        assert!(RuleName::new("x".repeat(65)).is_err());
        assert!(RuleName::new("x".repeat(64)).is_ok());
    }

    #[test]
    fn matches_is_case_insensitive() {
        let name = RuleName::new("OfficeMacros").unwrap();
        assert!(name.matches("officemacros"));
        assert!(!name.matches("OfficeOLE"));
    }

    #[test]
    fn deserialization_validates() {
        let ok: Result<RuleName, _> = serde_json::from_str("\"OfficeOLE\"");
        assert!(ok.is_ok());
        let bad: Result<RuleName, _> = serde_json::from_str("\"not valid\"");
        assert!(bad.is_err());
    }
}
