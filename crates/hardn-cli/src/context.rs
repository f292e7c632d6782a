//! Everything a subcommand operates on: resolved config, catalog and store.

use anyhow::{Context as _, Result};
use hardn_catalog::Catalog;
use hardn_core::{FileStore, Store};
use hardn_rules::Journal;

use crate::config::{HardnConfig, StoreKind};

/// The opened environment for one run.
pub struct RunContext {
    pub config: HardnConfig,
    pub catalog: Catalog,
    store: Box<dyn Store>,
}

impl RunContext {
    /// Load the catalog and open the store named by `config`.
    pub fn open(config: HardnConfig) -> Result<Self> {
        let catalog = load_catalog(&config)?;
        let store = open_store(&config)?;
        Ok(Self::new(config, catalog, store))
    }

    /// Assemble a context from parts already opened.
    pub fn new(config: HardnConfig, catalog: Catalog, store: Box<dyn Store>) -> Self {
        Self {
            config,
            catalog,
            store,
        }
    }

    /// The store being driven.
    pub fn store(&self) -> &dyn Store {
        &*self.store
    }

    /// Load the journal named by the config. A missing file is empty.
    pub fn load_journal(&self) -> Result<Journal> {
        let path = &self.config.journal_file;
        Journal::load(path).with_context(|| format!("failed to load journal: {}", path.display()))
    }

    /// Persist `journal` to the configured path.
    pub fn save_journal(&self, journal: &Journal) -> Result<()> {
        let path = &self.config.journal_file;
        journal
            .save(path)
            .with_context(|| format!("failed to save journal: {}", path.display()))
    }
}

impl std::fmt::Debug for RunContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunContext")
            .field("config", &self.config)
            .field("catalog", &self.catalog.origin())
            .finish_non_exhaustive()
    }
}

/// The configured catalog, or the built-in one.
pub fn load_catalog(config: &HardnConfig) -> Result<Catalog> {
    match &config.catalog {
        Some(path) => Catalog::load(path).context("failed to load catalog"),
        None => Catalog::builtin().context("built-in catalog is invalid"),
    }
}

/// Open the configured store backend.
pub fn open_store(config: &HardnConfig) -> Result<Box<dyn Store>> {
    match config.store {
        StoreKind::File => {
            let store = FileStore::open(&config.store_file).with_context(|| {
                format!("failed to open store file: {}", config.store_file.display())
            })?;
            Ok(Box::new(store))
        }
        StoreKind::Registry => open_registry(),
    }
}

#[cfg(windows)]
fn open_registry() -> Result<Box<dyn Store>> {
    tracing::debug!("opened registry store");
    Ok(Box::new(hardn_core::RegistryStore::new()))
}

#[cfg(not(windows))]
fn open_registry() -> Result<Box<dyn Store>> {
    anyhow::bail!("the registry store is only available on Windows; use --store file")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_opens_missing_file_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = HardnConfig {
            store: StoreKind::File,
            store_file: dir.path().join("store.json"),
            journal_file: dir.path().join("journal.json"),
            ..HardnConfig::default()
        };
        let ctx = RunContext::open(config).unwrap();
        assert_eq!(ctx.catalog.len(), 4);
        assert!(ctx.load_journal().unwrap().is_empty());
    }

    #[cfg(not(windows))]
    #[test]
    fn registry_store_is_rejected_off_windows() {
        let config = HardnConfig {
            store: StoreKind::Registry,
            ..HardnConfig::default()
        };
        match open_store(&config) {
            Err(err) => assert!(err.to_string().contains("only available on Windows")),
            Ok(_) => panic!("registry store opened off Windows"),
        }
    }

    #[test]
    fn missing_catalog_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = HardnConfig {
            catalog: Some(dir.path().join("missing.yaml")),
            ..HardnConfig::default()
        };
        assert!(load_catalog(&config).is_err());
    }
}
