//! # Error Hierarchy
//!
//! Structured error types for hardn, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Store errors always carry the concrete target they were raised for, so an
//! operator reading a failure can go straight to the offending key.

use std::path::PathBuf;

use thiserror::Error;

use crate::target::RuleTarget;

/// Top-level error type for hardn.
#[derive(Error, Debug)]
pub enum HardnError {
    /// Primitive store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Domain primitive validation failure.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A state or snapshot file could not be read or written.
    #[error("failed to access {path}")]
    Persist {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },

    /// A state or snapshot file is not valid JSON for its schema.
    #[error("malformed file {path}")]
    Malformed {
        /// The file being decoded.
        path: PathBuf,
        /// The underlying decode failure.
        source: serde_json::Error,
    },
}

/// Errors raised by a [`Store`](crate::store::Store) backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The key or value does not exist. Callers treat this as the pristine
    /// state, not as a failure.
    #[error("{target} does not exist")]
    NotFound {
        /// The target that was read.
        target: RuleTarget,
    },

    /// Permission denied or I/O failure while talking to the store.
    #[error("access to {target} failed")]
    Access {
        /// The target being read or written.
        target: RuleTarget,
        /// The underlying failure.
        source: std::io::Error,
    },

    /// The value exists but does not hold a DWORD.
    #[error("{target} does not hold a DWORD value")]
    TypeMismatch {
        /// The target that was read.
        target: RuleTarget,
    },
}

impl StoreError {
    /// Whether this error is the "does not exist" signal.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// The target this error was raised for.
    pub fn target(&self) -> &RuleTarget {
        match self {
            Self::NotFound { target }
            | Self::Access { target, .. }
            | Self::TypeMismatch { target } => target,
        }
    }
}

/// Validation errors for identifiers, templates and dimension vocabularies.
///
/// Each error carries the rejected input so that a malformed catalog can be
/// fixed without guesswork.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Rule names are stable machine keys: ASCII letters, digits, `_`, `-`, `.`.
    #[error("invalid rule name: \"{0}\" (expected 1-64 characters of [A-Za-z0-9_.-])")]
    InvalidRuleName(String),

    /// A path template must contain exactly two `{}` holes.
    #[error("invalid path template: \"{template}\" has {holes} holes (expected 2)")]
    InvalidPathTemplate {
        /// The rejected template.
        template: String,
        /// How many holes were found.
        holes: usize,
    },

    /// A dimension element cannot be substituted into a path.
    #[error("invalid {dimension} element \"{value}\": {reason}")]
    InvalidDimensionElement {
        /// Which dimension the element belongs to.
        dimension: &'static str,
        /// The rejected element.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A dimension has no elements, so the template would expand to nothing.
    #[error("{0} must contain at least one element")]
    EmptyDimension(&'static str),

    /// A target path or value name is empty.
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// A root scope name is not recognised.
    #[error("unknown root scope: \"{0}\"")]
    UnknownScope(String),
}
