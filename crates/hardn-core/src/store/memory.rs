//! In-memory store backend.
//!
//! Keys fold ASCII case the way the registry does. The store also counts
//! mutating calls so tests can assert that an operation wrote nothing.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use super::Store;
use crate::error::StoreError;
use crate::target::{Dword, RuleTarget};

/// A [`Store`] held entirely in memory.
///
/// `parking_lot::Mutex` gives `&self` mutation without poisoning; the engine
/// itself is single-threaded.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    // canonical key -> (target as first written, value)
    values: BTreeMap<String, (RuleTarget, Dword)>,
    mutations: usize,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `values`. Seeding does not count as a mutation.
    pub fn with_values(values: impl IntoIterator<Item = (RuleTarget, Dword)>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner.lock();
            for (target, value) in values {
                inner.values.insert(target.canonical_key(), (target, value));
            }
        }
        store
    }

    /// Read a value without going through the [`Store`] error path.
    pub fn peek(&self, target: &RuleTarget) -> Option<Dword> {
        self.inner
            .lock()
            .values
            .get(&target.canonical_key())
            .map(|(_, v)| *v)
    }

    /// Number of values held.
    pub fn len(&self) -> usize {
        self.inner.lock().values.len()
    }

    /// Whether the store holds no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `set_value`/`delete_value` calls served so far.
    pub fn mutation_count(&self) -> usize {
        self.inner.lock().mutations
    }

    /// All values, ordered by canonical key.
    pub fn entries(&self) -> Vec<(RuleTarget, Dword)> {
        self.inner.lock().values.values().cloned().collect()
    }
}

impl Store for MemoryStore {
    fn get_value(&self, target: &RuleTarget) -> Result<Dword, StoreError> {
        self.peek(target).ok_or_else(|| StoreError::NotFound {
            target: target.clone(),
        })
    }

    fn set_value(&self, target: &RuleTarget, value: Dword) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.mutations += 1;
        inner
            .values
            .entry(target.canonical_key())
            .and_modify(|(_, v)| *v = value)
            .or_insert_with(|| (target.clone(), value));
        Ok(())
    }

    fn delete_value(&self, target: &RuleTarget) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.mutations += 1;
        inner.values.remove(&target.canonical_key());
        Ok(())
    }
}
