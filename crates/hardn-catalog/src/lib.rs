//! # hardn-catalog — Rule Catalogs
//!
//! A catalog is the ordered list of top-level rules a run operates on. It is
//! configuration data, not engine logic: catalogs are YAML documents whose
//! declarations compile into [`hardn_rules`] rules.
//!
//! The built-in catalog covers Microsoft Office: packager objects, VBA
//! macros, ActiveX, and DDE link updates. It is embedded at compile time from
//! `catalogs/office.yaml`.
//!
//! ## Catalog File Format
//!
//! ```yaml
//! rules:
//!   - kind: single
//!     short_name: OfficeActiveX
//!     path: 'SOFTWARE\Microsoft\Office\Common\Security'
//!     value_name: DisableAllActiveX
//!     hardened_value: 1
//!   - kind: template
//!     short_name: OfficeMacros
//!     path_template: 'SOFTWARE\Microsoft\Office\{}\{}\Security'
//!     dimension_a: ["14.0", "15.0"]
//!     dimension_b: [Word, Excel]
//!     value_name: VBAWarnings
//!     hardened_value: 4
//!   - kind: group
//!     short_name: OfficeDDE
//!     members: [ ... ]
//! ```
//!
//! Other top-level keys are ignored, which leaves room for YAML anchors that
//! hold shared vocabularies.

pub mod decl;
pub mod error;

use std::collections::BTreeSet;
use std::path::Path;

use hardn_rules::{catalog_fingerprint, Rule};
use serde::Deserialize;

pub use decl::RuleDecl;
pub use error::{CatalogError, CatalogResult};

const BUILTIN_OFFICE: &str = include_str!("../catalogs/office.yaml");

#[derive(Debug, Deserialize)]
struct CatalogFile {
    rules: Vec<RuleDecl>,
}

/// An ordered, name-unique list of top-level rules.
#[derive(Debug)]
pub struct Catalog {
    origin: String,
    rules: Vec<Box<dyn Rule>>,
}

impl Catalog {
    /// The built-in Office catalog.
    pub fn builtin() -> CatalogResult<Self> {
        Self::from_yaml_str(BUILTIN_OFFICE, "builtin:office")
    }

    /// Parse and compile a YAML catalog. `origin` names the source in errors.
    pub fn from_yaml_str(yaml: &str, origin: &str) -> CatalogResult<Self> {
        let file: CatalogFile = serde_yaml::from_str(yaml).map_err(|source| CatalogError::Parse {
            origin: origin.to_string(),
            source,
        })?;
        Self::from_decls(&file.rules, origin)
    }

    /// Load a YAML catalog from disk.
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CatalogError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                CatalogError::Io {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;
        Self::from_yaml_str(&content, &path.display().to_string())
    }

    /// Compile declarations, rejecting duplicate names anywhere in the tree.
    pub fn from_decls(decls: &[RuleDecl], origin: &str) -> CatalogResult<Self> {
        if decls.is_empty() {
            return Err(CatalogError::Empty(origin.to_string()));
        }
        let mut seen = BTreeSet::new();
        for decl in decls {
            decl.collect_names(&mut seen)?;
        }
        let rules = decls
            .iter()
            .map(RuleDecl::build)
            .collect::<CatalogResult<Vec<_>>>()?;
        tracing::debug!(origin, rules = rules.len(), "loaded catalog");
        Ok(Self {
            origin: origin.to_string(),
            rules,
        })
    }

    /// Where the catalog came from.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Top-level rules in catalog order.
    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    /// Look up a top-level rule by short name, ignoring ASCII case.
    pub fn find(&self, name: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|r| r.name().eq_ignore_ascii_case(name))
            .map(|r| r.as_ref())
    }

    /// Select top-level rules in catalog order.
    ///
    /// An empty `only` selects everything; `skip` is applied afterwards.
    ///
    /// # Errors
    ///
    /// [`CatalogError::UnknownRule`] if `only` or `skip` names a rule the
    /// catalog lacks.
    pub fn select(&self, only: &[String], skip: &[String]) -> CatalogResult<Vec<&dyn Rule>> {
        for name in only.iter().chain(skip) {
            if self.find(name).is_none() {
                return Err(CatalogError::UnknownRule(name.clone()));
            }
        }
        let wanted = |rule: &dyn Rule| {
            let listed = |names: &[String]| names.iter().any(|n| n.eq_ignore_ascii_case(rule.name()));
            (only.is_empty() || listed(only)) && !listed(skip)
        };
        Ok(self
            .rules
            .iter()
            .map(|r| r.as_ref())
            .filter(|r| wanted(*r))
            .collect())
    }

    /// Fingerprint of every rule name and expanded target.
    pub fn fingerprint(&self) -> String {
        catalog_fingerprint(&self.rules)
    }

    /// Number of top-level rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the catalog is empty. Loaded catalogs never are.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
