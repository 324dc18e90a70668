//! Catalog command - list the enabled criteria

use super::setup;
use crate::checks::ExecutorRegistry;
use crate::config::EngineConfig;
use crate::reporters::OutputFormat;
use anyhow::Result;
use console::style;

pub fn run(config: &EngineConfig, format: OutputFormat) -> Result<()> {
    let source = setup::catalog_source(config);
    let catalog = source.load()?;
    let registry = ExecutorRegistry::builtin();

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&catalog.ordered())?);
        return Ok(());
    }

    println!("\n{} {}\n", style("Catalog").bold(), style(source.name()).dim());
    for criterion in catalog.ordered() {
        let executor = if registry.contains(&criterion.id) {
            style("").dim()
        } else {
            style(" (no executor)").yellow()
        };
        let preview = if criterion.preview {
            style(" preview").magenta()
        } else {
            style("").dim()
        };
        println!(
            "  {:<28} {:<5} w={:<4} pass>={:<3} warn>={:<3}{}{}",
            criterion.id,
            criterion.scope.to_string(),
            criterion.weight,
            criterion.pass_threshold,
            criterion.warn_threshold,
            preview,
            executor
        );
    }
    println!(
        "\n  {} enabled, {} disabled",
        catalog.len(),
        catalog.disabled_count()
    );
    Ok(())
}
