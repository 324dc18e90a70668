//! Open Graph completeness check (C11)

use super::base::CheckExecutor;
use super::ids;
use crate::content::PageDocument;
use crate::models::Evaluation;
use anyhow::Result;
use scraper::Selector;
use std::sync::LazyLock;

static OG_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[property^="og:"]"#).expect("BUG: hardcoded CSS selector 'og meta' is invalid")
});

const REQUIRED_PROPERTIES: &[&str] = &["og:title", "og:description", "og:image", "og:url"];

pub struct OpenGraphCheck;

impl OpenGraphCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OpenGraphCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckExecutor for OpenGraphCheck {
    fn id(&self) -> &'static str {
        ids::OPEN_GRAPH
    }

    fn description(&self) -> &'static str {
        "og:title, og:description, og:image and og:url present"
    }

    fn evaluate_page(&self, doc: &PageDocument) -> Result<Option<Evaluation>> {
        if !doc.has_html() {
            return Ok(None);
        }

        let present: Vec<&str> = doc
            .html()
            .select(&OG_SELECTOR)
            .filter(|m| m.value().attr("content").is_some_and(|c| !c.trim().is_empty()))
            .filter_map(|m| m.value().attr("property"))
            .collect();

        let (found, missing): (Vec<&str>, Vec<&str>) = REQUIRED_PROPERTIES
            .iter()
            .copied()
            .partition(|p| present.contains(p));

        let per_property = 100.0 / REQUIRED_PROPERTIES.len() as f64;
        Ok(Some(
            Evaluation::scored(per_property * found.len() as f64)
                .with_detail("present", found)
                .with_evidence_list(missing.iter().map(|p| format!("Missing {}", p))),
        ))
    }
}
