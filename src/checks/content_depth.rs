//! Content depth check (C9)
//!
//! Word count of the main content region, located through a cascade of
//! `main`, `article`, `[role=main]` and finally `body`.

use super::base::CheckExecutor;
use super::ids;
use crate::content::text::word_count;
use crate::content::{Cascade, PageDocument};
use crate::models::Evaluation;
use anyhow::Result;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

static MAIN_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("main").expect("BUG: hardcoded CSS selector 'main' is invalid"));
static ARTICLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article").expect("BUG: hardcoded CSS selector 'article' is invalid"));
static ROLE_MAIN_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"[role="main"]"#).expect("BUG: hardcoded CSS selector '[role=main]' is invalid")
});
static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").expect("BUG: hardcoded CSS selector 'body' is invalid"));

/// Text inside these elements is never counted
const NON_CONTENT_TAGS: &[&str] = &["script", "style", "noscript", "template", "svg"];

pub const THIN_CONTENT_WORDS: usize = 300;
pub const DEEP_CONTENT_WORDS: usize = 800;

pub struct ContentDepthCheck;

impl ContentDepthCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ContentDepthCheck {
    fn default() -> Self {
        Self::new()
    }
}

/// Visible words under an element
fn visible_words(el: ElementRef<'_>) -> usize {
    el.descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|a| {
                a.value()
                    .as_element()
                    .is_some_and(|e| NON_CONTENT_TAGS.contains(&e.name()))
            });
            (!hidden).then(|| word_count(text))
        })
        .sum()
}

fn region_words(doc: &PageDocument, selector: &Selector) -> Option<usize> {
    let total: usize = doc.html().select(selector).map(visible_words).sum();
    (total > 0).then_some(total)
}

/// 0 words -> 0, ramps to 60 at 300 words, to 100 at 800
pub fn depth_score(words: usize) -> f64 {
    let w = words as f64;
    if words < THIN_CONTENT_WORDS {
        60.0 * w / THIN_CONTENT_WORDS as f64
    } else if words < DEEP_CONTENT_WORDS {
        60.0 + 40.0 * (w - THIN_CONTENT_WORDS as f64) / (DEEP_CONTENT_WORDS - THIN_CONTENT_WORDS) as f64
    } else {
        100.0
    }
}

impl CheckExecutor for ContentDepthCheck {
    fn id(&self) -> &'static str {
        ids::CONTENT_DEPTH
    }

    fn description(&self) -> &'static str {
        "Word count of the main content region"
    }

    fn evaluate_page(&self, doc: &PageDocument) -> Result<Option<Evaluation>> {
        if !doc.has_html() {
            return Ok(None);
        }

        let region = Cascade::new()
            .then("main", || region_words(doc, &MAIN_SELECTOR))
            .then("article", || region_words(doc, &ARTICLE_SELECTOR))
            .then("role_main", || region_words(doc, &ROLE_MAIN_SELECTOR))
            .then("body", || region_words(doc, &BODY_SELECTOR))
            .resolve(|_| true);

        let (words, source) = region.map_or((0, "none"), |r| (r.value, r.source));
        let mut eval = Evaluation::scored(depth_score(words))
            .with_detail("words", words)
            .with_detail("region", source);
        if words < THIN_CONTENT_WORDS {
            eval = eval.with_evidence(format!("Thin content: {} words", words));
        }
        Ok(Some(eval))
    }
}
