//! Score command - recompute the composite of a stored audit

use super::manifest::AuditManifest;
use super::setup;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::reporters::{render_composite, OutputFormat};
use crate::scoring::CompositeScorer;
use crate::store::ResultStore;
use anyhow::Result;
use std::path::{Path, PathBuf};

pub fn run(config: &EngineConfig, manifest_path: &Path, db: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    let manifest = AuditManifest::load(manifest_path)?;
    let store = setup::open_store(config, db)?;

    let mut results = Vec::new();
    let mut missing = Vec::new();
    for page_id in manifest.page_ids() {
        match store.load_for_page(&page_id)? {
            Some(page_results) => results.extend(page_results),
            None => missing.push(page_id),
        }
    }
    if !missing.is_empty() {
        return Err(EngineError::PagesIncomplete {
            audit_id: manifest.audit_id.clone(),
            missing,
        }
        .into());
    }
    let Some(site_results) = store.load_for_audit(&manifest.audit_id)? else {
        anyhow::bail!(
            "No site results stored for audit {}; run `sitegrade audit` first",
            manifest.audit_id
        );
    };
    results.extend(site_results);

    let catalog = setup::catalog_source(config).load()?;
    let composite = CompositeScorer::new(&catalog).score(&results);
    println!("{}", render_composite(&manifest.audit_id, &composite, format)?);
    Ok(())
}
