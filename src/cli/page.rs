//! Page command - evaluate one HTML file

use super::setup;
use crate::checks::ExecutorRegistry;
use crate::config::EngineConfig;
use crate::content::domain::{host_of, registrable_domain};
use crate::engine::PageOrchestrator;
use crate::models::{PageContext, SiteDescriptor};
use crate::reporters::{render_page, OutputFormat};
use crate::store::MemoryStore;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug)]
pub struct PageArgs {
    pub file: PathBuf,
    pub url: String,
    pub static_file: Option<PathBuf>,
    pub domain: Option<String>,
    pub locale: Option<String>,
    pub page_id: Option<String>,
}

fn read(path: &PathBuf) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn run(config: &EngineConfig, args: PageArgs, format: OutputFormat) -> Result<()> {
    let rendered = read(&args.file)?;
    let static_html = args.static_file.as_ref().map(read).transpose()?;

    let domain = match args.domain {
        Some(domain) => domain,
        None => host_of(&args.url)
            .map(|h| registrable_domain(&h))
            .with_context(|| format!("Cannot derive a domain from {}; pass --domain", args.url))?,
    };
    let page_id = args.page_id.unwrap_or_else(|| {
        args.file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "page".to_string())
    });

    let ctx = PageContext {
        page_id: page_id.clone(),
        url: args.url,
        rendered_html: Some(rendered),
        static_html,
        site: SiteDescriptor {
            homepage_url: format!("https://{}/", domain),
            domain,
            target_locale: args.locale,
        },
    };

    let orchestrator = PageOrchestrator::new(
        setup::catalog_source(config),
        Arc::new(ExecutorRegistry::builtin()),
        Arc::new(MemoryStore::new()),
    )
    .with_limits(config.limits());
    let results = orchestrator.evaluate(&ctx)?;

    println!("{}", render_page(&page_id, &results, format)?);
    Ok(())
}
