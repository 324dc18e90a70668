//! Title quality check (C1)
//!
//! Scores the `<title>` on length and on whether it names the site's brand.

use super::base::CheckExecutor;
use super::ids;
use crate::content::{contains_at_word_boundary, length_score, normalize_brand, resolve_brand, PageDocument};
use crate::models::Evaluation;
use anyhow::Result;
use scraper::Selector;
use std::sync::LazyLock;

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("BUG: hardcoded CSS selector 'title' is invalid"));

pub const TITLE_MIN_CHARS: usize = 15;
pub const TITLE_MAX_CHARS: usize = 65;

/// Share of the score carried by length; the rest is brand presence
const LENGTH_SHARE: f64 = 0.6;
const BRAND_POINTS: f64 = 40.0;

pub struct TitleQualityCheck;

impl TitleQualityCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TitleQualityCheck {
    fn default() -> Self {
        Self::new()
    }
}

/// Brand matches the raw title or its normalized form at a word boundary
pub fn title_mentions_brand(title: &str, brand: &str) -> bool {
    contains_at_word_boundary(title, brand) || contains_at_word_boundary(&normalize_brand(title), brand)
}

impl CheckExecutor for TitleQualityCheck {
    fn id(&self) -> &'static str {
        ids::TITLE_QUALITY
    }

    fn description(&self) -> &'static str {
        "Title length within 15-65 characters and names the brand"
    }

    fn evaluate_page(&self, doc: &PageDocument) -> Result<Option<Evaluation>> {
        if !doc.has_html() {
            return Ok(None);
        }

        let title = doc.first_text(&TITLE_SELECTOR).unwrap_or_default();
        if title.is_empty() {
            return Ok(Some(
                Evaluation::scored(0.0)
                    .with_detail("title", "")
                    .with_detail("length", 0)
                    .with_evidence("Page has no <title>"),
            ));
        }

        let length = title.chars().count();
        let brand = resolve_brand(doc);
        let brand_in_title = brand
            .as_ref()
            .is_some_and(|b| title_mentions_brand(&title, &b.value));

        let mut score = LENGTH_SHARE * length_score(length, TITLE_MIN_CHARS, TITLE_MAX_CHARS);
        if brand_in_title {
            score += BRAND_POINTS;
        }

        let mut eval = Evaluation::scored(score)
            .with_detail("title", title.as_str())
            .with_detail("length", length)
            .with_detail("brand_in_title", brand_in_title);
        if let Some(b) = &brand {
            eval = eval
                .with_detail("brand", b.value.as_str())
                .with_detail("brand_source", b.source);
        }
        if length < TITLE_MIN_CHARS {
            eval = eval.with_evidence(format!("Title is short ({} chars)", length));
        } else if length > TITLE_MAX_CHARS {
            eval = eval.with_evidence(format!("Title is long ({} chars)", length));
        }
        if !brand_in_title {
            eval = eval.with_evidence("Title does not name the brand");
        }
        Ok(Some(eval))
    }
}
