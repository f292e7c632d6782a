//! # hardn-core — Foundational Types for hardn
//!
//! This crate is the leaf of the hardn workspace. It defines the vocabulary
//! every other crate speaks: where a mutation lands ([`RuleTarget`]), what was
//! there before it ([`OriginalState`]), how rules are named ([`RuleName`]),
//! and the primitive store the engine mutates ([`Store`]).
//!
//! ## Key Design Principles
//!
//! 1. **Targets are immutable.** A [`RuleTarget`] is built once and never
//!    edited. Expanded templates produce fresh targets rather than patching
//!    existing ones.
//!
//! 2. **"Not found" is a signal, not a failure.** [`StoreError::is_not_found`]
//!    is the single predicate the engine uses to tell a pristine value apart
//!    from a genuine access failure.
//!
//! 3. **Stores are swappable.** The in-memory, JSON-file and Windows registry
//!    backends all implement the same [`Store`] trait, so the rule engine never
//!    knows which one it is driving.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `hardn-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod store;
pub mod target;

// Re-export primary types for ergonomic imports.
pub use error::{HardnError, StoreError, ValidationError};
pub use identity::RuleName;
pub use store::{FileStore, MemoryStore, Store};
pub use target::{Dword, OriginalState, RootScope, RuleTarget};

#[cfg(windows)]
pub use store::RegistryStore;
