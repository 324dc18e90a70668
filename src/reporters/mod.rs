//! Output reporters for sitegrade results
//!
//! Supports two output formats:
//! - `text` - Terminal output with colors
//! - `json` - Machine-readable JSON

mod json;
mod text;

use crate::engine::AuditReport;
use crate::models::CheckResult;
use crate::scoring::CompositeOutput;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Render a full audit report
pub fn render_audit(report: &AuditReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render_audit(report),
        OutputFormat::Json => json::render(report),
    }
}

/// Render the results of a single page run
pub fn render_page(page_id: &str, results: &[CheckResult], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render_page(page_id, results),
        OutputFormat::Json => json::render(&serde_json::json!({
            "page_id": page_id,
            "results": results,
        })),
    }
}

/// Render a composite recomputed from stored results
pub fn render_composite(audit_id: &str, composite: &CompositeOutput, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render_composite(audit_id, composite),
        OutputFormat::Json => json::render(&serde_json::json!({
            "audit_id": audit_id,
            "composite": composite,
        })),
    }
}
