//! Configuration module for sitegrade
//!
//! This module handles:
//! - Engine configuration (`sitegrade.toml` / `.sitegraderc.json`)
//! - Document size limits and page worker count
//! - Network probe settings
//! - Catalog and result store locations

mod engine_config;

pub use engine_config::{
    apply_env_overrides, default_db_path, load_config, CatalogSection, EngineConfig, EngineSection,
    NetworkSection, StorageSection, CONFIG_FILE, JSON_CONFIG_FILE,
};
