//! CLI command definitions and handlers

mod audit;
mod catalog;
mod init;
pub mod manifest;
mod page;
mod score;
mod setup;

use crate::reporters::OutputFormat;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse and validate workers count (0 = auto, up to 64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n > 64 {
        Err("workers cannot exceed 64".to_string())
    } else {
        Ok(n)
    }
}

/// sitegrade - content diagnostics and composite scoring for web audits
#[derive(Parser, Debug)]
#[command(name = "sitegrade")]
#[command(
    version,
    about = "Catalog-driven content diagnostics and composite scoring for web audits",
    after_help = "\
Examples:
  sitegrade init                              Write sitegrade.toml and criteria.toml
  sitegrade catalog                           List enabled criteria
  sitegrade page index.html --url https://acme.com/
  sitegrade audit audit.json --format json    Run a full audit from a manifest
  sitegrade score audit.json                  Recompute the composite from stored results"
)]
pub struct Cli {
    /// Directory holding sitegrade.toml / .sitegraderc.json
    #[arg(long, global = true, default_value = ".")]
    pub config_dir: PathBuf,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Number of parallel page workers (0 = config value or auto, max 64)
    #[arg(long, global = true, default_value = "0", value_parser = parse_workers)]
    pub workers: usize,

    /// Output format: text, json
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a sitegrade.toml and an editable catalog with the built-in criteria
    Init {
        /// Catalog file to create (.toml or .json)
        #[arg(long, default_value = "criteria.toml")]
        catalog: PathBuf,

        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// List the enabled criteria of the configured catalog
    Catalog,

    /// Evaluate a single HTML file (results are not persisted)
    Page {
        /// Rendered HTML file
        file: PathBuf,

        /// Page URL
        #[arg(long)]
        url: String,

        /// Static (pre-render) HTML file used when the render looks broken
        #[arg(long = "static")]
        static_file: Option<PathBuf>,

        /// Site domain (default: host of --url)
        #[arg(long)]
        domain: Option<String>,

        /// Target locale, e.g. en-US
        #[arg(long)]
        locale: Option<String>,

        /// Page id (default: file stem)
        #[arg(long)]
        page_id: Option<String>,
    },

    /// Run every page of an audit manifest, then the site checks
    #[command(after_help = "\
Manifest (JSON):
  {
    \"audit_id\": \"acme-2026-10\",
    \"site\": {\"domain\": \"acme.com\", \"homepage_url\": \"https://acme.com/\", \"target_locale\": \"en-US\"},
    \"pages\": [
      {\"page_id\": \"home\", \"url\": \"https://acme.com/\", \"rendered\": \"home.html\", \"static\": \"home.raw.html\"}
    ]
  }

HTML paths are relative to the manifest.")]
    Audit {
        /// Audit manifest (JSON)
        manifest: PathBuf,

        /// Result database (overrides config and SITEGRADE_DB)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Skip robots.txt and sitemap requests (every probe reads as not found)
        #[arg(long)]
        offline: bool,
    },

    /// Recompute the composite score of a stored audit
    Score {
        /// Audit manifest (JSON) naming the audit and its pages
        manifest: PathBuf,

        /// Result database (overrides config and SITEGRADE_DB)
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let config = setup::load(&cli.config_dir, cli.workers);
    match cli.command {
        Commands::Init { catalog, force } => init::run(&cli.config_dir, &catalog, force),
        Commands::Catalog => catalog::run(&config, cli.format),
        Commands::Page {
            file,
            url,
            static_file,
            domain,
            locale,
            page_id,
        } => page::run(
            &config,
            page::PageArgs {
                file,
                url,
                static_file,
                domain,
                locale,
                page_id,
            },
            cli.format,
        ),
        Commands::Audit { manifest, db, offline } => {
            audit::run(&config, &manifest, db, offline, cli.format)
        }
        Commands::Score { manifest, db } => score::run(&config, &manifest, db, cli.format),
    }
}
