//! File-backed catalog: TOML `[[criteria]]` tables or a JSON array

use super::{Catalog, CatalogSource};
use crate::error::{EngineError, EngineResult};
use crate::models::Criterion;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// On-disk layout of a catalog file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub criteria: Vec<Criterion>,
}

/// Catalog read from disk on every load
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_json(&self) -> bool {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"))
    }

    fn read_records(&self) -> anyhow::Result<Vec<Criterion>> {
        let content = std::fs::read_to_string(&self.path)?;
        if self.is_json() {
            // Bare array or {"criteria": [...]}
            if let Ok(records) = serde_json::from_str::<Vec<Criterion>>(&content) {
                return Ok(records);
            }
            let file: CatalogFile = serde_json::from_str(&content)?;
            return Ok(file.criteria);
        }
        let file: CatalogFile = toml::from_str(&content)?;
        Ok(file.criteria)
    }
}

impl CatalogSource for FileCatalog {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> EngineResult<Catalog> {
        let records = self.read_records().map_err(|e| EngineError::Catalog {
            source_name: self.name(),
            message: e.to_string(),
        })?;
        debug!("Read {} criteria from {}", records.len(), self.path.display());
        Catalog::from_records(&self.name(), records)
    }
}

/// Write `criteria` as a catalog file, TOML or JSON by extension
pub fn write_catalog(path: &Path, criteria: &[Criterion]) -> anyhow::Result<()> {
    let file = CatalogFile {
        criteria: criteria.to_vec(),
    };
    let content = if FileCatalog::new(path).is_json() {
        serde_json::to_string_pretty(&file.criteria)?
    } else {
        toml::to_string_pretty(&file)?
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}
