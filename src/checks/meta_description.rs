//! Meta description check (C2)

use super::base::CheckExecutor;
use super::ids;
use crate::content::{length_score, PageDocument};
use crate::models::Evaluation;
use anyhow::Result;
use scraper::Selector;
use std::sync::LazyLock;

static DESCRIPTION_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[name="description"], meta[name="Description"]"#)
        .expect("BUG: hardcoded CSS selector 'meta description' is invalid")
});

pub const DESCRIPTION_MIN_CHARS: usize = 50;
pub const DESCRIPTION_MAX_CHARS: usize = 160;

pub struct MetaDescriptionCheck;

impl MetaDescriptionCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MetaDescriptionCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckExecutor for MetaDescriptionCheck {
    fn id(&self) -> &'static str {
        ids::META_DESCRIPTION
    }

    fn description(&self) -> &'static str {
        "Meta description present and 50-160 characters long"
    }

    fn evaluate_page(&self, doc: &PageDocument) -> Result<Option<Evaluation>> {
        if !doc.has_html() {
            return Ok(None);
        }

        let Some(description) = doc.first_attr(&DESCRIPTION_SELECTOR, "content") else {
            return Ok(Some(
                Evaluation::scored(0.0)
                    .with_detail("description", "")
                    .with_evidence("No meta description"),
            ));
        };

        let length = description.chars().count();
        let eval = Evaluation::scored(length_score(length, DESCRIPTION_MIN_CHARS, DESCRIPTION_MAX_CHARS))
            .with_detail("description", description.as_str())
            .with_detail("length", length);
        let eval = match length {
            n if n < DESCRIPTION_MIN_CHARS => eval.with_evidence(format!("Description is short ({} chars)", n)),
            n if n > DESCRIPTION_MAX_CHARS => eval.with_evidence(format!("Description is long ({} chars)", n)),
            _ => eval,
        };
        Ok(Some(eval))
    }
}
