//! Audit command - run a manifest through the full pipeline

use super::manifest::AuditManifest;
use super::setup;
use crate::checks::ExecutorRegistry;
use crate::config::EngineConfig;
use crate::engine::{AuditRunner, ProgressCallback};
use crate::reporters::{render_audit, OutputFormat};
use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

fn bar_style() -> Result<ProgressStyle> {
    Ok(ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
        .progress_chars("█▓▒░  "))
}

pub fn run(
    config: &EngineConfig,
    manifest_path: &Path,
    db: Option<PathBuf>,
    offline: bool,
    format: OutputFormat,
) -> Result<()> {
    let start = Instant::now();
    let manifest = AuditManifest::load(manifest_path)?;
    let input = manifest.to_input()?;
    let store = setup::open_store(config, db)?;

    let bar = if format == OutputFormat::Text {
        ProgressBar::new(input.pages.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    bar.set_style(bar_style()?);
    bar.set_message("Evaluating pages...");
    let progress_bar = bar.clone();
    let callback: ProgressCallback = Arc::new(move |page_id: &str, done: usize, total: usize| {
        progress_bar.set_position(done as u64);
        progress_bar.set_message(format!("[{}/{}] {}", done, total, page_id));
    });

    let runner = AuditRunner::new(
        setup::catalog_source(config),
        Arc::new(ExecutorRegistry::builtin()),
        store.clone(),
        setup::fetcher(config, offline),
    )
    .with_workers(config.engine.workers)
    .with_limits(config.limits())
    .with_progress_callback(callback);

    let report = runner.run(&input);
    bar.finish_and_clear();
    let report = report?;

    println!("{}", render_audit(&report, format)?);
    if format == OutputFormat::Text {
        eprintln!(
            "{} {} pages in {:.1}s, results stored in {}",
            style("✓").green(),
            report.pages.len(),
            start.elapsed().as_secs_f64(),
            style(store.path().display()).cyan()
        );
    }
    Ok(())
}
