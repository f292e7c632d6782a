//! # Primitive Store
//!
//! The [`Store`] trait is the only surface the rule engine mutates. It is a
//! path + name addressed hierarchical key-value store holding DWORD values.
//!
//! ## Contract
//!
//! - `get_value` returns [`StoreError::NotFound`] when either the key or the
//!   value is missing. Every other failure is an access error.
//! - `set_value` creates intermediate keys as needed.
//! - `delete_value` succeeds when the value is already absent.
//!
//! Each call is its own atomic unit. No backend offers transactions across
//! several targets.

mod file;
mod memory;
#[cfg(windows)]
mod registry;

pub use file::FileStore;
pub use memory::MemoryStore;
#[cfg(windows)]
pub use registry::RegistryStore;

use crate::error::StoreError;
use crate::target::{Dword, RuleTarget};

/// Primitive read/write access to the hierarchical store.
pub trait Store {
    /// Read the DWORD at `target`.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if the key or value does not exist,
    /// [`StoreError::TypeMismatch`] if the value is not a DWORD,
    /// [`StoreError::Access`] for anything else.
    fn get_value(&self, target: &RuleTarget) -> Result<Dword, StoreError>;

    /// Write `value` at `target`, creating intermediate keys.
    fn set_value(&self, target: &RuleTarget, value: Dword) -> Result<(), StoreError>;

    /// Delete the value at `target`. Already absent is success.
    fn delete_value(&self, target: &RuleTarget) -> Result<(), StoreError>;

    /// Whether a value exists at `target`.
    fn exists(&self, target: &RuleTarget) -> bool {
        self.get_value(target).is_ok()
    }
}

impl<S: Store + ?Sized> Store for &S {
    fn get_value(&self, target: &RuleTarget) -> Result<Dword, StoreError> {
        (**self).get_value(target)
    }

    fn set_value(&self, target: &RuleTarget, value: Dword) -> Result<(), StoreError> {
        (**self).set_value(target, value)
    }

    fn delete_value(&self, target: &RuleTarget) -> Result<(), StoreError> {
        (**self).delete_value(target)
    }

    fn exists(&self, target: &RuleTarget) -> bool {
        (**self).exists(target)
    }
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn get_value(&self, target: &RuleTarget) -> Result<Dword, StoreError> {
        (**self).get_value(target)
    }

    fn set_value(&self, target: &RuleTarget, value: Dword) -> Result<(), StoreError> {
        (**self).set_value(target, value)
    }

    fn delete_value(&self, target: &RuleTarget) -> Result<(), StoreError> {
        (**self).delete_value(target)
    }

    fn exists(&self, target: &RuleTarget) -> bool {
        (**self).exists(target)
    }
}
