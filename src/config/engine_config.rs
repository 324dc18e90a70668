//! Engine configuration support
//!
//! Loads configuration from `sitegrade.toml` or `.sitegraderc.json` in the
//! working directory.
//!
//! # Configuration Format
//!
//! ```toml
//! # sitegrade.toml
//!
//! [engine]
//! max_html_bytes = 2097152
//! min_rendered_bytes = 1024
//! workers = 8            # 0 = auto
//!
//! [network]
//! timeout_secs = 10
//! user_agent = "sitegrade/0.3"
//!
//! [catalog]
//! path = "criteria.toml"  # omit to use the built-in catalog
//!
//! [storage]
//! path = "/var/lib/sitegrade/results.redb"
//! ```
//!
//! `SITEGRADE_CATALOG` and `SITEGRADE_DB` override the catalog and storage
//! paths.

use crate::checks::network::{DEFAULT_PROBE_TIMEOUT, DEFAULT_USER_AGENT};
use crate::content::document::{DEFAULT_MAX_HTML_BYTES, DEFAULT_MIN_RENDERED_BYTES};
use crate::content::DocumentLimits;
use crate::store::DEFAULT_DB_FILE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

pub const CONFIG_FILE: &str = "sitegrade.toml";
pub const JSON_CONFIG_FILE: &str = ".sitegraderc.json";

const CATALOG_ENV: &str = "SITEGRADE_CATALOG";
const DB_ENV: &str = "SITEGRADE_DB";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub engine: EngineSection,
    pub network: NetworkSection,
    pub catalog: CatalogSection,
    pub storage: StorageSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSection {
    pub max_html_bytes: usize,
    pub min_rendered_bytes: usize,
    pub workers: usize,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            max_html_bytes: DEFAULT_MAX_HTML_BYTES,
            min_rendered_bytes: DEFAULT_MIN_RENDERED_BYTES,
            workers: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSection {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for NetworkSection {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_PROBE_TIMEOUT.as_secs(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSection {
    /// Catalog file; `None` selects the built-in criteria
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// redb file; `None` selects [`default_db_path`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl EngineConfig {
    pub fn limits(&self) -> DocumentLimits {
        DocumentLimits {
            max_html_bytes: self.engine.max_html_bytes,
            min_rendered_bytes: self.engine.min_rendered_bytes,
        }
    }

    pub fn probe_timeout(&self) -> Duration {
        if self.network.timeout_secs == 0 {
            DEFAULT_PROBE_TIMEOUT
        } else {
            Duration::from_secs(self.network.timeout_secs)
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.storage.path.clone().unwrap_or_else(default_db_path)
    }

    fn resolve_paths(&mut self, dir: &Path) {
        for path in [&mut self.catalog.path, &mut self.storage.path].into_iter().flatten() {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// `<data dir>/sitegrade/results.redb`, or the working directory when no data dir exists
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("sitegrade"))
        .unwrap_or_else(|| PathBuf::from(".sitegrade"))
        .join(DEFAULT_DB_FILE)
}

/// Load config from `dir`, falling back to defaults, then apply env overrides.
///
/// Relative paths in the file are resolved against `dir`.
pub fn load_config(dir: &Path) -> EngineConfig {
    let mut config = load_file_config(dir);
    config.resolve_paths(dir);
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

fn load_file_config(dir: &Path) -> EngineConfig {
    // Try TOML first (preferred format)
    let toml_path = dir.join(CONFIG_FILE);
    if toml_path.exists() {
        match load_toml_config(&toml_path) {
            Ok(config) => {
                debug!("Loaded config from {}", toml_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", toml_path.display(), e);
            }
        }
    }

    let json_path = dir.join(JSON_CONFIG_FILE);
    if json_path.exists() {
        match load_json_config(&json_path) {
            Ok(config) => {
                debug!("Loaded config from {}", json_path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", json_path.display(), e);
            }
        }
    }

    debug!("No config found, using defaults");
    EngineConfig::default()
}

fn load_toml_config(path: &Path) -> anyhow::Result<EngineConfig> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

fn load_json_config(path: &Path) -> anyhow::Result<EngineConfig> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Apply `SITEGRADE_CATALOG` / `SITEGRADE_DB` as returned by `lookup`
pub fn apply_env_overrides<F>(config: &mut EngineConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = lookup(CATALOG_ENV).filter(|v| !v.trim().is_empty()) {
        debug!("{} overrides catalog path", CATALOG_ENV);
        config.catalog.path = Some(PathBuf::from(path));
    }
    if let Some(path) = lookup(DB_ENV).filter(|v| !v.trim().is_empty()) {
        debug!("{} overrides storage path", DB_ENV);
        config.storage.path = Some(PathBuf::from(path));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = load_file_config(dir.path());
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.limits(), DocumentLimits::default());
        assert_eq!(config.probe_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_toml() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[engine]\nworkers = 3\n\n[storage]\npath = \"/tmp/x.redb\"\n",
        )
        .unwrap();
        let config = load_file_config(dir.path());
        assert_eq!(config.engine.workers, 3);
        assert_eq!(config.engine.max_html_bytes, DEFAULT_MAX_HTML_BYTES);
        assert_eq!(config.db_path(), PathBuf::from("/tmp/x.redb"));
    }

    #[test]
    fn test_json_fallback_and_malformed_toml() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "[engine\nworkers = ").unwrap();
        std::fs::write(
            dir.path().join(JSON_CONFIG_FILE),
            r#"{"network": {"timeout_secs": 3}}"#,
        )
        .unwrap();
        let config = load_file_config(dir.path());
        assert_eq!(config.probe_timeout(), Duration::from_secs(3));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = EngineConfig::default();
        apply_env_overrides(&mut config, |key| match key {
            "SITEGRADE_CATALOG" => Some("crit.json".to_string()),
            "SITEGRADE_DB" => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.catalog.path, Some(PathBuf::from("crit.json")));
        assert_eq!(config.storage.path, None);
    }

    #[test]
    fn test_relative_paths_follow_config_dir() {
        let mut config = EngineConfig::default();
        config.catalog.path = Some(PathBuf::from("criteria.toml"));
        config.storage.path = Some(PathBuf::from("/abs/results.redb"));
        config.resolve_paths(Path::new("/etc/sitegrade"));
        assert_eq!(config.catalog.path, Some(PathBuf::from("/etc/sitegrade/criteria.toml")));
        assert_eq!(config.storage.path, Some(PathBuf::from("/abs/results.redb")));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = EngineConfig::default();
        let text = config.to_toml().unwrap();
        let parsed: EngineConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
