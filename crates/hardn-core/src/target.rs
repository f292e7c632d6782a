//! # Targets and Original State
//!
//! A [`RuleTarget`] names one concrete mutation point in the hierarchical
//! store: a root scope, a key path below it, and a value name inside that key.
//! An [`OriginalState`] records what that point held before hardening so it
//! can be put back.
//!
//! Key paths and value names compare case-insensitively in the registry.
//! [`RuleTarget::canonical_key`] folds ASCII case so that two spellings of the
//! same key share one journal slot.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The value type every hardening rule writes: a 32-bit registry DWORD.
pub type Dword = u32;

/// Predefined root of the hierarchical store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootScope {
    /// Per-user settings (`HKEY_CURRENT_USER`).
    #[serde(alias = "HKCU", alias = "HKEY_CURRENT_USER")]
    CurrentUser,
    /// Machine-wide settings (`HKEY_LOCAL_MACHINE`).
    #[serde(alias = "HKLM", alias = "HKEY_LOCAL_MACHINE")]
    LocalMachine,
    /// File associations and COM registrations (`HKEY_CLASSES_ROOT`).
    #[serde(alias = "HKCR", alias = "HKEY_CLASSES_ROOT")]
    ClassesRoot,
    /// All loaded user profiles (`HKEY_USERS`).
    #[serde(alias = "HKU", alias = "HKEY_USERS")]
    Users,
}

impl RootScope {
    /// All root scopes, in declaration order.
    pub const ALL: [RootScope; 4] = [
        Self::CurrentUser,
        Self::LocalMachine,
        Self::ClassesRoot,
        Self::Users,
    ];

    /// The conventional hive name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CurrentUser => "HKEY_CURRENT_USER",
            Self::LocalMachine => "HKEY_LOCAL_MACHINE",
            Self::ClassesRoot => "HKEY_CLASSES_ROOT",
            Self::Users => "HKEY_USERS",
        }
    }

    fn short_form(&self) -> &'static str {
        match self {
            Self::CurrentUser => "HKCU",
            Self::LocalMachine => "HKLM",
            Self::ClassesRoot => "HKCR",
            Self::Users => "HKU",
        }
    }

    fn snake_form(&self) -> &'static str {
        match self {
            Self::CurrentUser => "current_user",
            Self::LocalMachine => "local_machine",
            Self::ClassesRoot => "classes_root",
            Self::Users => "users",
        }
    }
}

impl std::str::FromStr for RootScope {
    type Err = ValidationError;

    /// Accepts the hive name, its abbreviation, or the snake_case form,
    /// ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scope| {
                s.eq_ignore_ascii_case(scope.as_str())
                    || s.eq_ignore_ascii_case(scope.short_form())
                    || s.eq_ignore_ascii_case(scope.snake_form())
            })
            .ok_or_else(|| ValidationError::UnknownScope(s.to_string()))
    }
}

impl std::fmt::Display for RootScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One concrete `(scope, path, value name)` address in the store.
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTarget")]
pub struct RuleTarget {
    scope: RootScope,
    path: String,
    value_name: String,
}

#[derive(Deserialize)]
struct RawTarget {
    scope: RootScope,
    path: String,
    value_name: String,
}

impl TryFrom<RawTarget> for RuleTarget {
    type Error = ValidationError;

    fn try_from(raw: RawTarget) -> Result<Self, Self::Error> {
        Self::new(raw.scope, raw.path, raw.value_name)
    }
}

impl RuleTarget {
    /// Create a target.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTarget`] if the path or value name is
    /// empty, or if the path starts or ends with a separator.
    pub fn new(
        scope: RootScope,
        path: impl Into<String>,
        value_name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let path = path.into();
        let value_name = value_name.into();
        if path.is_empty() {
            return Err(ValidationError::InvalidTarget(format!(
                "empty key path for value \"{value_name}\""
            )));
        }
        if path.starts_with('\\') || path.ends_with('\\') {
            return Err(ValidationError::InvalidTarget(format!(
                "key path \"{path}\" must not start or end with a separator"
            )));
        }
        if value_name.is_empty() {
            return Err(ValidationError::InvalidTarget(format!(
                "empty value name under \"{path}\""
            )));
        }
        Ok(Self {
            scope,
            path,
            value_name,
        })
    }

    /// The root scope.
    pub fn scope(&self) -> RootScope {
        self.scope
    }

    /// The key path below the root scope, `\`-separated.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The value name inside the key.
    pub fn value_name(&self) -> &str {
        &self.value_name
    }

    /// Case-folded identity of the target, used as a map key.
    pub fn canonical_key(&self) -> String {
        format!(
            "{}\\{}\\[{}]",
            self.scope.as_str(),
            self.path.to_ascii_lowercase(),
            self.value_name.to_ascii_lowercase()
        )
    }
}

impl std::fmt::Display for RuleTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\\{} [{}]", self.scope, self.path, self.value_name)
    }
}

/// What a target held before the first hardening write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OriginalState {
    /// The value (or its key) did not exist.
    Absent,
    /// The value existed and held `value`.
    Present {
        /// The pre-hardening value.
        value: Dword,
    },
}

impl OriginalState {
    /// Whether the value existed before hardening.
    pub fn existed(&self) -> bool {
        matches!(self, Self::Present { .. })
    }

    /// The pre-hardening value, if there was one.
    pub fn value(&self) -> Option<Dword> {
        match self {
            Self::Absent => None,
            Self::Present { value } => Some(*value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_display_names_every_part() {
        let t = RuleTarget::new(RootScope::CurrentUser, "App\\Security", "FeatureFlag").unwrap();
        assert_eq!(t.to_string(), "HKEY_CURRENT_USER\\App\\Security [FeatureFlag]");
    }

    #[test]
    fn canonical_key_folds_case() {
        let a = RuleTarget::new(RootScope::CurrentUser, "SOFTWARE\\Office", "Options").unwrap();
        let b = RuleTarget::new(RootScope::CurrentUser, "Software\\office", "OPTIONS").unwrap();
        assert_ne!(a, b);
        assert_eq!(a.canonical_key(), b.canonical_key());
    }

    #[test]
    fn canonical_key_distinguishes_scopes() {
        let a = RuleTarget::new(RootScope::CurrentUser, "K", "V").unwrap();
        let b = RuleTarget::new(RootScope::LocalMachine, "K", "V").unwrap();
        assert_ne!(a.canonical_key(), b.canonical_key());
    }

    #[test]
    fn rejects_empty_parts() {
        assert!(RuleTarget::new(RootScope::CurrentUser, "", "V").is_err());
        assert!(RuleTarget::new(RootScope::CurrentUser, "K", "").is_err());
    }

    #[test]
    fn rejects_leading_or_trailing_separator() {
        assert!(RuleTarget::new(RootScope::CurrentUser, "\\K", "V").is_err());
        assert!(RuleTarget::new(RootScope::CurrentUser, "K\\", "V").is_err());
    }

    #[test]
    fn scope_parses_every_spelling() {
        for input in ["HKEY_CURRENT_USER", "hkcu", "current_user", "Current_User"] {
            assert_eq!(input.parse::<RootScope>().unwrap(), RootScope::CurrentUser);
        }
        assert_eq!("HKLM".parse::<RootScope>().unwrap(), RootScope::LocalMachine);
        assert!("HKEY_NOWHERE".parse::<RootScope>().is_err());
    }

    #[test]
    fn scope_deserializes_aliases() {
        let s: RootScope = serde_json::from_str("\"HKCU\"").unwrap();
        assert_eq!(s, RootScope::CurrentUser);
        let s: RootScope = serde_json::from_str("\"local_machine\"").unwrap();
        assert_eq!(s, RootScope::LocalMachine);
    }

    #[test]
    fn target_deserialization_validates() {
        let bad = serde_json::json!({"scope": "current_user", "path": "", "value_name": "V"});
        assert!(serde_json::from_value::<RuleTarget>(bad).is_err());
    }

    #[test]
    fn original_state_accessors() {
        assert!(!OriginalState::Absent.existed());
        assert_eq!(OriginalState::Absent.value(), None);
        let present = OriginalState::Present { value: 7 };
        assert!(present.existed());
        assert_eq!(present.value(), Some(7));
    }

    #[test]
    fn original_state_serialized_form() {
        let json = serde_json::to_value(OriginalState::Present { value: 1 }).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "present", "value": 1}));
        let json = serde_json::to_value(OriginalState::Absent).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "absent"}));
    }
}
