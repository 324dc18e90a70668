//! Init command - write a starter config and an editable catalog

use crate::catalog::{default_criteria, write_catalog};
use crate::config::{EngineConfig, CONFIG_FILE};
use anyhow::{Context, Result};
use console::style;
use std::path::Path;

/// Run the init command
pub fn run(dir: &Path, catalog: &Path, force: bool) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    println!("\n{} Initializing sitegrade\n", style("▸").bold());

    let catalog_path = if catalog.is_absolute() {
        catalog.to_path_buf()
    } else {
        dir.join(catalog)
    };
    if catalog_path.exists() && !force {
        println!(
            "{} Keeping existing {}",
            style("-").dim(),
            style(catalog_path.display()).cyan()
        );
    } else {
        write_catalog(&catalog_path, &default_criteria())
            .with_context(|| format!("Failed to write {}", catalog_path.display()))?;
        println!(
            "{} Created {}",
            style("✓").green(),
            style(catalog_path.display()).cyan()
        );
    }

    let config_path = dir.join(CONFIG_FILE);
    if config_path.exists() && !force {
        println!(
            "{} Keeping existing {}",
            style("-").dim(),
            style(config_path.display()).cyan()
        );
    } else {
        let mut config = EngineConfig::default();
        config.catalog.path = Some(catalog.to_path_buf());
        let content = format!("# sitegrade configuration\n\n{}", config.to_toml()?);
        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        println!(
            "{} Created {}",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
    }

    println!(
        "\nEdit weights, thresholds and {} flags in the catalog, then run {}",
        style("enabled/preview").bold(),
        style("sitegrade audit <manifest.json>").cyan()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogSource, FileCatalog};
    use crate::config::load_config;
    use tempfile::tempdir;

    #[test]
    fn test_init_writes_loadable_files() {
        let dir = tempdir().unwrap();
        run(dir.path(), Path::new("criteria.toml"), false).unwrap();

        let catalog = FileCatalog::new(dir.path().join("criteria.toml")).load().unwrap();
        assert_eq!(catalog.len() + catalog.disabled_count(), default_criteria().len());

        let config = load_config(dir.path());
        assert_eq!(config.catalog.path, Some(dir.path().join("criteria.toml")));
    }
}
