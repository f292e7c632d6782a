//! # Configuration
//!
//! `hardn` reads an optional YAML file. An explicit `--config` path must
//! exist; otherwise `hardn.yaml` in the working directory is used when
//! present, and built-in defaults apply when it is not.
//!
//! ```yaml
//! store: file                    # file | registry
//! store_file: hardn-store.json
//! journal_file: hardn-journal.json
//! catalog: null                  # path to a YAML catalog, null = built-in
//! skip: [OfficeActiveX]
//! ```
//!
//! Global command-line flags override individual fields after loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File name looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "hardn.yaml";

/// Which store backend a run mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    /// A JSON file holding a registry image.
    File,
    /// The live Windows registry.
    Registry,
}

/// Resolved run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HardnConfig {
    pub store: StoreKind,
    pub store_file: PathBuf,
    pub journal_file: PathBuf,
    pub catalog: Option<PathBuf>,
    pub skip: Vec<String>,
}

impl Default for HardnConfig {
    fn default() -> Self {
        Self {
            store: if cfg!(windows) {
                StoreKind::Registry
            } else {
                StoreKind::File
            },
            store_file: PathBuf::from("hardn-store.json"),
            journal_file: PathBuf::from("hardn-journal.json"),
            catalog: None,
            skip: Vec::new(),
        }
    }
}

/// Flag values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub store: Option<StoreKind>,
    pub store_file: Option<PathBuf>,
    pub journal_file: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
}

impl HardnConfig {
    /// Parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Parse config YAML. An empty document yields the defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Locate and load the config for this run.
    ///
    /// `explicit` must name an existing file. Without it, `hardn.yaml` in
    /// `cwd` is used if present.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let candidate = cwd.join(DEFAULT_CONFIG_FILE);
                if candidate.is_file() {
                    tracing::debug!(path = %candidate.display(), "using config from working directory");
                    Self::load(&candidate)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(store) = overrides.store {
            self.store = store;
        }
        if let Some(store_file) = overrides.store_file {
            self.store_file = store_file;
        }
        if let Some(journal_file) = overrides.journal_file {
            self.journal_file = journal_file;
        }
        if let Some(catalog) = overrides.catalog {
            self.catalog = Some(catalog);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(HardnConfig::from_yaml_str("").unwrap(), HardnConfig::default());
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = HardnConfig::from_yaml_str("store: file\nskip: [OfficeActiveX]\n").unwrap();
        assert_eq!(config.store, StoreKind::File);
        assert_eq!(config.skip, vec!["OfficeActiveX".to_string()]);
        assert_eq!(config.journal_file, PathBuf::from("hardn-journal.json"));
        assert!(config.catalog.is_none());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(HardnConfig::from_yaml_str("stor: file\n").is_err());
    }

    #[test]
    fn unknown_store_kind_is_rejected() {
        assert!(HardnConfig::from_yaml_str("store: cloud\n").is_err());
    }

    #[test]
    fn overrides_win() {
        let config = HardnConfig::from_yaml_str("store: registry\njournal_file: a.json\n")
            .unwrap()
            .with_overrides(Overrides {
                store: Some(StoreKind::File),
                journal_file: Some(PathBuf::from("b.json")),
                ..Overrides::default()
            });
        assert_eq!(config.store, StoreKind::File);
        assert_eq!(config.journal_file, PathBuf::from("b.json"));
        assert_eq!(config.store_file, PathBuf::from("hardn-store.json"));
    }

    #[test]
    fn discover_prefers_working_directory_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "skip: [OfficeDDE]\n").unwrap();
        let config = HardnConfig::discover(None, dir.path()).unwrap();
        assert_eq!(config.skip, vec!["OfficeDDE".to_string()]);
    }

    #[test]
    fn discover_without_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            HardnConfig::discover(None, dir.path()).unwrap(),
            HardnConfig::default()
        );
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        let err = HardnConfig::discover(Some(&missing), dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("nope.yaml"));
    }
}
