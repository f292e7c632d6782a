//! Catalog-specific error types.
//!
//! Every error names the catalog origin or the offending rule so a broken
//! catalog file can be fixed from the message alone.

use std::path::PathBuf;

use hardn_core::ValidationError;
use thiserror::Error;

/// Errors raised while loading a catalog or selecting rules from it.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// YAML parsing failed.
    #[error("failed to parse catalog {origin}")]
    Parse {
        origin: String,
        source: serde_yaml::Error,
    },

    /// The catalog file does not exist.
    #[error("catalog file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The catalog file exists but could not be read.
    #[error("failed to read catalog {path}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A declaration is syntactically valid YAML but not a valid rule.
    #[error("invalid rule {rule}")]
    InvalidRule {
        rule: String,
        source: ValidationError,
    },

    /// Two declarations share a short name.
    #[error("duplicate rule name: {0}")]
    DuplicateName(String),

    /// A selection names a rule the catalog does not have.
    #[error("unknown rule: {0}")]
    UnknownRule(String),

    /// The catalog declares nothing.
    #[error("catalog {0} declares no rules")]
    Empty(String),
}

/// Convenience alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
