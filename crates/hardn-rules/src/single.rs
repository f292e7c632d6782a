//! # Single-Target Rule
//!
//! Binds one [`RuleTarget`] to one hardened DWORD. This is the only rule type
//! that calls into the [`Store`]; templates and composites reduce to it.
//!
//! ## Harden
//!
//! 1. Read the current value. `NotFound` means the target is pristine and is
//!    recorded as [`OriginalState::Absent`]; any other read error aborts.
//! 2. Capture the original state into the journal (first capture wins).
//! 3. Write the hardened value, creating intermediate keys.
//!
//! ## Restore
//!
//! - Journal says `Absent`: delete the value.
//! - Journal says `Present(v)`: write `v` back.
//! - Target already restored from this journal: nothing to do.
//! - No journal entry at all: delete the value only if it still holds the
//!   hardened value, otherwise leave it alone.
//!
//! The journal entry is released only after the store accepted the restore.

use hardn_core::{Dword, OriginalState, RuleTarget, Store, StoreError};

use crate::error::RuleError;
use crate::rule::{Rule, RuleMeta, Session};

/// A rule over exactly one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleTargetRule {
    meta: RuleMeta,
    target: RuleTarget,
    hardened_value: Dword,
}

impl SingleTargetRule {
    /// Bind `target` to `hardened_value`.
    pub fn new(meta: RuleMeta, target: RuleTarget, hardened_value: Dword) -> Self {
        Self {
            meta,
            target,
            hardened_value,
        }
    }

    /// The target.
    pub fn target(&self) -> &RuleTarget {
        &self.target
    }

    /// The value written when hardening.
    pub fn hardened_value(&self) -> Dword {
        self.hardened_value
    }

    fn fail(&self, source: StoreError) -> RuleError {
        RuleError::Store {
            rule: self.meta.name().clone(),
            source,
        }
    }

    fn harden(&self, session: &mut Session<'_>) -> Result<(), RuleError> {
        let store = session.store();
        let state = match store.get_value(&self.target) {
            Ok(value) => OriginalState::Present { value },
            Err(e) if e.is_not_found() => OriginalState::Absent,
            Err(e) => return Err(self.fail(e)),
        };

        if session
            .journal_mut()
            .capture(&self.target, self.meta.name(), state)
        {
            tracing::debug!(rule = %self.meta.name(), target = %self.target, ?state, "captured original state");
        } else {
            tracing::debug!(rule = %self.meta.name(), target = %self.target, "original state already captured");
        }

        store
            .set_value(&self.target, self.hardened_value)
            .map_err(|e| self.fail(e))?;
        tracing::debug!(rule = %self.meta.name(), target = %self.target, value = self.hardened_value, "wrote hardened value");
        Ok(())
    }

    fn restore(&self, session: &mut Session<'_>) -> Result<(), RuleError> {
        let store = session.store();
        let captured = session.journal().get(&self.target).map(|entry| entry.state);

        match captured {
            Some(OriginalState::Absent) => {
                store.delete_value(&self.target).map_err(|e| self.fail(e))?;
                tracing::debug!(rule = %self.meta.name(), target = %self.target, "deleted value absent before hardening");
            }
            Some(OriginalState::Present { value }) => {
                store
                    .set_value(&self.target, value)
                    .map_err(|e| self.fail(e))?;
                tracing::debug!(rule = %self.meta.name(), target = %self.target, value, "restored original value");
            }
            None if session.journal().was_restored(&self.target) => {
                tracing::debug!(rule = %self.meta.name(), target = %self.target, "already restored");
                return Ok(());
            }
            None => return self.restore_uncaptured(store),
        }

        session.journal_mut().release(&self.target);
        Ok(())
    }

    fn restore_uncaptured(&self, store: &dyn Store) -> Result<(), RuleError> {
        match store.get_value(&self.target) {
            Ok(current) if current == self.hardened_value => {
                tracing::warn!(
                    rule = %self.meta.name(),
                    target = %self.target,
                    "no original state captured; removing hardened value"
                );
                store.delete_value(&self.target).map_err(|e| self.fail(e))
            }
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(self.fail(e)),
        }
    }
}

impl Rule for SingleTargetRule {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn apply(&self, session: &mut Session<'_>, enable: bool) -> Result<(), RuleError> {
        if enable {
            self.harden(session)
        } else {
            self.restore(session)
        }
    }

    fn is_hardened(&self, store: &dyn Store) -> bool {
        matches!(store.get_value(&self.target), Ok(v) if v == self.hardened_value)
    }

    fn targets(&self) -> Vec<RuleTarget> {
        vec![self.target.clone()]
    }
}
