//! # Original-State Journal
//!
//! Records what each target held before its first hardening write, keyed by
//! the target's case-folded identity. The journal is the only place captured
//! state lives; rules themselves stay stateless, so a template that expands
//! to fresh rule objects on every call can still be restored.
//!
//! ## Capture Discipline
//!
//! [`Journal::capture`] inserts only when the target has no entry yet. A
//! second harden without an intervening restore therefore keeps the true
//! pre-hardening value instead of recording the hardened value as "original".
//! [`Journal::release`] removes the entry once a restore has succeeded and
//! leaves a restored marker for the target. Until the next capture, a restore
//! of a marked target is a no-op, so a value that already equalled the
//! hardened value before hardening is never mistaken for a leftover write.
//!
//! ## Persistence
//!
//! The journal serializes to JSON so a restore can run in a later process.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::{DateTime, Utc};
use hardn_core::{HardnError, OriginalState, RuleName, RuleTarget};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::rule::Rule;

/// One captured original state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// The target as the capturing rule spelled it.
    pub target: RuleTarget,
    /// Short name of the rule that captured it.
    pub rule: RuleName,
    /// What the target held before hardening.
    pub state: OriginalState,
    /// When the capture happened.
    pub captured_at: DateTime<Utc>,
}

/// Captured original state for every target hardened and not yet restored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    catalog_fingerprint: Option<String>,
    #[serde(default)]
    entries: BTreeMap<String, JournalEntry>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    restored: BTreeSet<String>,
}

impl Journal {
    /// An empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `state` for `target` unless an entry already exists.
    ///
    /// Returns `true` when the entry was inserted.
    pub fn capture(&mut self, target: &RuleTarget, rule: &RuleName, state: OriginalState) -> bool {
        let key = target.canonical_key();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.restored.remove(&key);
        self.entries.insert(
            key,
            JournalEntry {
                target: target.clone(),
                rule: rule.clone(),
                state,
                captured_at: Utc::now(),
            },
        );
        true
    }

    /// The entry for `target`, if one was captured.
    pub fn get(&self, target: &RuleTarget) -> Option<&JournalEntry> {
        self.entries.get(&target.canonical_key())
    }

    /// Remove and return the entry for `target`, marking the target as
    /// restored when an entry was present.
    pub fn release(&mut self, target: &RuleTarget) -> Option<JournalEntry> {
        let key = target.canonical_key();
        let entry = self.entries.remove(&key)?;
        self.restored.insert(key);
        Some(entry)
    }

    /// Whether `target` was restored from this journal and not captured since.
    pub fn was_restored(&self, target: &RuleTarget) -> bool {
        self.restored.contains(&target.canonical_key())
    }

    /// Number of captured targets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is captured. Restored markers do not count.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, ordered by canonical target key.
    pub fn entries(&self) -> impl Iterator<Item = &JournalEntry> {
        self.entries.values()
    }

    /// Entries captured by the rule named `rule`.
    pub fn entries_for<'s>(&'s self, rule: &'s str) -> impl Iterator<Item = &'s JournalEntry> + 's {
        self.entries.values().filter(move |e| e.rule.matches(rule))
    }

    /// Fingerprint of the catalog that produced these entries.
    pub fn catalog_fingerprint(&self) -> Option<&str> {
        self.catalog_fingerprint.as_deref()
    }

    /// Record the fingerprint of the catalog being applied.
    pub fn set_catalog_fingerprint(&mut self, fingerprint: impl Into<String>) {
        self.catalog_fingerprint = Some(fingerprint.into());
    }

    /// Load a journal from `path`. A missing file is an empty journal.
    ///
    /// # Errors
    ///
    /// [`HardnError::Persist`] if the file exists but cannot be read,
    /// [`HardnError::Malformed`] if it is not a journal.
    pub fn load(path: &Path) -> Result<Self, HardnError> {
        match std::fs::read(path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| HardnError::Malformed {
                path: path.to_path_buf(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(source) => Err(HardnError::Persist {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Write the journal to `path`, replacing any previous content.
    pub fn save(&self, path: &Path) -> Result<(), HardnError> {
        let mut bytes = serde_json::to_vec_pretty(self).map_err(|source| HardnError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;
        bytes.push(b'\n');
        std::fs::write(path, bytes).map_err(|source| HardnError::Persist {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// SHA-256 hex digest over every rule name and the case-folded identity of
/// every target it expands to, in catalog order.
///
/// Two catalogs with the same fingerprint touch the same targets in the same
/// order under the same names.
pub fn catalog_fingerprint(rules: &[Box<dyn Rule>]) -> String {
    let mut hasher = Sha256::new();
    for rule in rules {
        hasher.update(rule.name().as_bytes());
        hasher.update(b"\0");
        for target in rule.targets() {
            hasher.update(target.canonical_key().as_bytes());
            hasher.update(b"\0");
        }
        hasher.update(b"\n");
    }
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
