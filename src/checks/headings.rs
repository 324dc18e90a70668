//! Heading structure check (C4)

use super::base::CheckExecutor;
use super::ids;
use crate::content::PageDocument;
use crate::models::Evaluation;
use anyhow::Result;
use scraper::Selector;
use std::sync::LazyLock;

static HEADING_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6").expect("BUG: hardcoded CSS selector 'h1-h6' is invalid")
});

const MISSING_H1_PENALTY: f64 = 40.0;
const MULTIPLE_H1_PENALTY: f64 = 25.0;
const SKIP_PENALTY: f64 = 10.0;
const MAX_SKIP_PENALTY: f64 = 30.0;

pub struct HeadingStructureCheck;

impl HeadingStructureCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HeadingStructureCheck {
    fn default() -> Self {
        Self::new()
    }
}

/// Heading levels in document order
fn heading_levels(doc: &PageDocument) -> Vec<u8> {
    doc.html()
        .select(&HEADING_SELECTOR)
        .filter_map(|el| el.value().name().strip_prefix('h')?.parse::<u8>().ok())
        .collect()
}

impl CheckExecutor for HeadingStructureCheck {
    fn id(&self) -> &'static str {
        ids::HEADING_STRUCTURE
    }

    fn description(&self) -> &'static str {
        "Exactly one h1 and no skipped heading levels"
    }

    fn evaluate_page(&self, doc: &PageDocument) -> Result<Option<Evaluation>> {
        if !doc.has_html() {
            return Ok(None);
        }

        let levels = heading_levels(doc);
        let h1_count = levels.iter().filter(|&&l| l == 1).count();
        let skips: Vec<(u8, u8)> = levels
            .windows(2)
            .filter(|w| w[1] > w[0] + 1)
            .map(|w| (w[0], w[1]))
            .collect();

        let mut score = 100.0;
        let mut evidence = Vec::new();
        match h1_count {
            0 => {
                score -= MISSING_H1_PENALTY;
                evidence.push("No h1 heading".to_string());
            }
            1 => {}
            n => {
                score -= MULTIPLE_H1_PENALTY;
                evidence.push(format!("{} h1 headings", n));
            }
        }
        score -= (SKIP_PENALTY * skips.len() as f64).min(MAX_SKIP_PENALTY);
        evidence.extend(skips.iter().map(|(from, to)| format!("Heading jumps from h{} to h{}", from, to)));

        Ok(Some(
            Evaluation::scored(score)
                .with_detail("h1_count", h1_count)
                .with_detail("headings", levels.len())
                .with_detail("skipped_levels", skips.len())
                .with_evidence_list(evidence),
        ))
    }
}
