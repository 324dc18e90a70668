//! Document language check (C10)

use super::base::CheckExecutor;
use super::ids;
use crate::content::PageDocument;
use crate::models::Evaluation;
use anyhow::Result;
use scraper::Selector;
use std::sync::LazyLock;

static HTML_LANG_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("html[lang]").expect("BUG: hardcoded CSS selector 'html[lang]' is invalid"));

const MISMATCH_SCORE: f64 = 50.0;

pub struct LanguageCheck;

impl LanguageCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LanguageCheck {
    fn default() -> Self {
        Self::new()
    }
}

/// Primary language subtag: `en` for `en-US`, `pt` for `pt_BR`
pub fn primary_subtag(tag: &str) -> String {
    tag.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

impl CheckExecutor for LanguageCheck {
    fn id(&self) -> &'static str {
        ids::LANGUAGE
    }

    fn description(&self) -> &'static str {
        "html lang attribute present and matching the site's target locale"
    }

    fn evaluate_page(&self, doc: &PageDocument) -> Result<Option<Evaluation>> {
        if !doc.has_html() {
            return Ok(None);
        }

        let Some(lang) = doc.first_attr(&HTML_LANG_SELECTOR, "lang") else {
            return Ok(Some(
                Evaluation::scored(0.0).with_evidence("Missing lang attribute on <html>"),
            ));
        };

        let eval = Evaluation::default().with_detail("lang", lang.as_str());
        let target = doc
            .site()
            .target_locale
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let eval = match target {
            None => Evaluation { score: 100.0, ..eval },
            Some(target) => {
                let eval = eval.with_detail("target_locale", target);
                if primary_subtag(&lang) == primary_subtag(target) {
                    Evaluation { score: 100.0, ..eval }
                } else {
                    Evaluation { score: MISMATCH_SCORE, ..eval }
                        .with_evidence(format!("lang=\"{}\" does not match target locale {}", lang, target))
                }
            }
        };
        Ok(Some(eval))
    }
}
