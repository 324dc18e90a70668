//! Organization entity graph check (C6)
//!
//! Points: Organization present 40, logo 20, `sameAs` up to 25, and the
//! organization's name appearing in the title 15.

use super::base::CheckExecutor;
use super::ids;
use super::title::title_mentions_brand;
use crate::content::structured_data::{has_logo, same_as_count, string_field, ENTITY_TYPES};
use crate::content::{normalize_brand, PageDocument};
use crate::models::Evaluation;
use anyhow::Result;
use scraper::Selector;
use std::sync::LazyLock;

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("BUG: hardcoded CSS selector 'title' is invalid"));

const ORGANIZATION_POINTS: f64 = 40.0;
const LOGO_POINTS: f64 = 20.0;
const NAME_IN_TITLE_POINTS: f64 = 15.0;

pub struct EntityGraphCheck;

impl EntityGraphCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EntityGraphCheck {
    fn default() -> Self {
        Self::new()
    }
}

/// 1 link -> 12, 2 -> 20, then +2.5 per link up to 25
pub fn same_as_points(links: usize) -> f64 {
    match links {
        0 => 0.0,
        1 => 12.0,
        n => (20.0 + 2.5 * (n - 2) as f64).min(25.0),
    }
}

impl CheckExecutor for EntityGraphCheck {
    fn id(&self) -> &'static str {
        ids::ENTITY_GRAPH
    }

    fn description(&self) -> &'static str {
        "Organization structured data with logo, sameAs profiles and a name matching the title"
    }

    fn evaluate_page(&self, doc: &PageDocument) -> Result<Option<Evaluation>> {
        if !doc.has_html() {
            return Ok(None);
        }

        let data = doc.structured_data();
        let entities: Vec<&str> = ENTITY_TYPES
            .iter()
            .copied()
            .filter(|kind| data.has_entity(kind))
            .collect();

        let Some(org) = data.organization() else {
            return Ok(Some(
                Evaluation::scored(0.0)
                    .with_detail("organization", false)
                    .with_detail("entities", entities)
                    .with_evidence("No Organization structured data"),
            ));
        };

        let logo = has_logo(org);
        let links = same_as_count(org);
        let name = string_field(org, "name");
        let title = doc.first_text(&TITLE_SELECTOR).unwrap_or_default();
        let name_in_title = name
            .as_deref()
            .map(normalize_brand)
            .is_some_and(|n| !n.is_empty() && title_mentions_brand(&title, &n));

        let mut score = ORGANIZATION_POINTS + same_as_points(links);
        let mut eval = Evaluation::default();
        if logo {
            score += LOGO_POINTS;
        } else {
            eval = eval.with_evidence("Organization has no logo");
        }
        if links == 0 {
            eval = eval.with_evidence("Organization has no sameAs profiles");
        }
        if name_in_title {
            score += NAME_IN_TITLE_POINTS;
        }

        eval.score = score;
        Ok(Some(
            eval.with_detail("organization", true)
                .with_detail("entities", entities)
                .with_detail("logo", logo)
                .with_detail("same_as", links)
                .with_detail("name", name.unwrap_or_default())
                .with_detail("name_in_title", name_in_title),
        ))
    }
}
