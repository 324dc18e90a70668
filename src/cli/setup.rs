//! Shared wiring for CLI commands: config, catalog source, store, fetcher

use crate::catalog::{CatalogSource, FileCatalog, StaticCatalog};
use crate::checks::{Fetcher, HttpFetcher, StaticFetcher};
use crate::config::{load_config, EngineConfig};
use crate::store::RedbStore;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Load config from `dir`; a non-zero `workers` flag wins over the file
pub fn load(dir: &Path, workers: usize) -> EngineConfig {
    let mut config = load_config(dir);
    if workers > 0 {
        config.engine.workers = workers;
    }
    config
}

pub fn catalog_source(config: &EngineConfig) -> Arc<dyn CatalogSource> {
    match &config.catalog.path {
        Some(path) => {
            debug!("Using catalog file {}", path.display());
            Arc::new(FileCatalog::new(path.clone()))
        }
        None => {
            debug!("Using built-in catalog");
            Arc::new(StaticCatalog::builtin())
        }
    }
}

pub fn open_store(config: &EngineConfig, db: Option<PathBuf>) -> Result<Arc<RedbStore>> {
    let path = db.unwrap_or_else(|| config.db_path());
    let store = RedbStore::open(&path)
        .with_context(|| format!("Failed to open result store {}", path.display()))?;
    Ok(Arc::new(store))
}

pub fn fetcher(config: &EngineConfig, offline: bool) -> Arc<dyn Fetcher> {
    if offline {
        Arc::new(StaticFetcher::offline())
    } else {
        Arc::new(HttpFetcher::new(
            config.probe_timeout(),
            config.network.user_agent.clone(),
        ))
    }
}
