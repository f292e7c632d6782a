//! # hardn-rules — Hardening Rule Engine
//!
//! A small polymorphic family of rules that all answer the same three
//! questions: harden this, is this hardened, put this back.
//!
//! - [`SingleTargetRule`] binds one target and one hardened value. It is the
//!   only rule that touches the [`Store`](hardn_core::Store).
//! - [`TemplateExpansionRule`] expands a two-hole path template over the cross
//!   product of two closed vocabularies, producing fresh single-target rules on
//!   every call.
//! - [`CompositeRule`] delegates to an ordered list of heterogeneous members,
//!   nested composites included.
//!
//! ## Original State
//!
//! What a target held before hardening is captured into a [`Journal`] carried
//! by the [`Session`], not into the rule object. Capture happens once per
//! dirty cycle: re-hardening an already-hardened target keeps the first
//! capture, so a single restore still returns the pre-hardening value.
//!
//! ## Failure Semantics
//!
//! `apply` is sequential and fails fast; the first member error is returned
//! unchanged and members already mutated are not rolled back. `is_hardened`
//! never fails and always checks every member.

pub mod composite;
pub mod error;
pub mod journal;
pub mod report;
pub mod rule;
pub mod single;
pub mod template;

pub use composite::CompositeRule;
pub use error::RuleError;
pub use journal::{catalog_fingerprint, Journal, JournalEntry};
pub use report::{RuleReport, TargetReport};
pub use rule::{Rule, RuleMeta, Session};
pub use single::SingleTargetRule;
pub use template::{Dimension, PathTemplate, TemplateExpansionRule};
