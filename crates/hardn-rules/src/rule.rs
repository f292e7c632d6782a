//! # The Rule Contract
//!
//! Every rule variant implements [`Rule`], so callers holding a
//! `Box<dyn Rule>` never need to know whether it fans out internally.
//!
//! Mutating calls take a [`Session`], which pairs the store with the
//! [`Journal`] that receives captured original state. Verification only
//! needs the store.

use hardn_core::{RuleName, RuleTarget, Store, ValidationError};

use crate::error::RuleError;
use crate::journal::Journal;

/// Identity metadata shared by every rule variant.
///
/// Descriptive only: no invariant depends on these fields beyond the short
/// name being unique within a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMeta {
    name: RuleName,
    long_name: Option<String>,
    description: Option<String>,
}

impl RuleMeta {
    /// Metadata with only a short name.
    pub fn new(name: RuleName) -> Self {
        Self {
            name,
            long_name: None,
            description: None,
        }
    }

    /// Validate `name` and build metadata from it.
    pub fn named(name: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self::new(RuleName::new(name)?))
    }

    /// Attach a human-readable label.
    pub fn with_long_name(mut self, long_name: impl Into<String>) -> Self {
        self.long_name = Some(long_name.into());
        self
    }

    /// Attach a prose description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The stable machine key.
    pub fn name(&self) -> &RuleName {
        &self.name
    }

    /// The human label, falling back to the short name.
    pub fn long_name(&self) -> &str {
        self.long_name.as_deref().unwrap_or(self.name.as_str())
    }

    /// The description, empty when none was given.
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// The apply / verify / restore contract.
pub trait Rule: std::fmt::Debug {
    /// Identity metadata.
    fn meta(&self) -> &RuleMeta;

    /// Harden (`enable == true`) or restore (`enable == false`).
    ///
    /// # Errors
    ///
    /// The first [`RuleError`] raised by any target. Targets processed before
    /// the failure stay mutated.
    fn apply(&self, session: &mut Session<'_>, enable: bool) -> Result<(), RuleError>;

    /// Whether every target currently holds its hardened value. Never fails:
    /// any read error counts as not hardened.
    fn is_hardened(&self, store: &dyn Store) -> bool;

    /// The concrete targets this rule touches, in application order.
    fn targets(&self) -> Vec<RuleTarget>;

    /// Short name.
    fn name(&self) -> &str {
        self.meta().name().as_str()
    }

    /// Human label.
    fn long_name(&self) -> &str {
        self.meta().long_name()
    }

    /// Prose description.
    fn description(&self) -> &str {
        self.meta().description()
    }
}

/// The store being mutated and the journal recording what it held before.
pub struct Session<'a> {
    store: &'a dyn Store,
    journal: &'a mut Journal,
}

impl<'a> Session<'a> {
    /// Start a session over `store`, recording into `journal`.
    pub fn new(store: &'a dyn Store, journal: &'a mut Journal) -> Self {
        Self { store, journal }
    }

    /// The store.
    pub fn store(&self) -> &'a dyn Store {
        self.store
    }

    /// The journal.
    pub fn journal(&self) -> &Journal {
        &*self.journal
    }

    /// Mutable access to the journal.
    pub fn journal_mut(&mut self) -> &mut Journal {
        &mut *self.journal
    }

    /// Apply `rule` with `enable == true`.
    pub fn harden(&mut self, rule: &dyn Rule) -> Result<(), RuleError> {
        tracing::info!(rule = %rule.name(), "hardening");
        rule.apply(self, true)
    }

    /// Apply `rule` with `enable == false`.
    pub fn restore(&mut self, rule: &dyn Rule) -> Result<(), RuleError> {
        tracing::info!(rule = %rule.name(), "restoring");
        rule.apply(self, false)
    }
}

impl std::fmt::Debug for Session<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("journal_entries", &self.journal.len())
            .finish_non_exhaustive()
    }
}
