//! Image alt text check (C8)

use super::base::CheckExecutor;
use super::ids;
use crate::content::PageDocument;
use crate::models::Evaluation;
use anyhow::Result;
use scraper::Selector;
use std::sync::LazyLock;

static IMG_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("BUG: hardcoded CSS selector 'img' is invalid"));

pub struct ImageAltCheck;

impl ImageAltCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageAltCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckExecutor for ImageAltCheck {
    fn id(&self) -> &'static str {
        ids::IMAGE_ALT
    }

    fn description(&self) -> &'static str {
        "Share of images carrying an alt attribute"
    }

    fn evaluate_page(&self, doc: &PageDocument) -> Result<Option<Evaluation>> {
        let images: Vec<_> = doc.html().select(&IMG_SELECTOR).collect();
        if images.is_empty() {
            return Ok(None);
        }

        let missing: Vec<String> = images
            .iter()
            .filter(|img| img.value().attr("alt").is_none())
            .map(|img| img.value().attr("src").unwrap_or("(no src)").to_string())
            .collect();
        let with_alt = images.len() - missing.len();

        Ok(Some(
            Evaluation::scored(100.0 * with_alt as f64 / images.len() as f64)
                .with_detail("images", images.len())
                .with_detail("with_alt", with_alt)
                .with_evidence_list(missing.into_iter().take(5).map(|src| format!("Missing alt: {}", src))),
        ))
    }
}
