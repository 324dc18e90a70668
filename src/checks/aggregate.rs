//! Site-level aggregates over persisted page results (S3-S6)
//!
//! Every aggregate returns a `not_applicable` evaluation with score 0 when
//! there is nothing to aggregate.

use super::base::{CheckExecutor, SiteInput};
use super::ids;
use crate::content::text::collapse_whitespace;
use crate::models::Evaluation;
use anyhow::Result;
use std::collections::HashMap;

/// Page score at or above which a page counts as passing
pub const PASS_CUTOFF: f64 = 60.0;

/// Share (0-100) of scores at or above `cutoff`
pub fn percent_passing(scores: &[f64], cutoff: f64) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let passing = scores.iter().filter(|&&s| s >= cutoff).count();
    100.0 * passing as f64 / scores.len() as f64
}

/// Rounded arithmetic mean; 0 for no values
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    (values.iter().sum::<f64>() / values.len() as f64).round()
}

/// Case/whitespace-insensitive key; empty values are ignored
fn dedup_key(value: &str) -> Option<String> {
    let key = collapse_whitespace(value).to_lowercase();
    (!key.is_empty()).then_some(key)
}

/// Values that occur more than once, most frequent first
pub fn duplicated_values(values: &[String]) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for key in values.iter().filter_map(|v| dedup_key(v)) {
        *counts.entry(key).or_default() += 1;
    }
    let mut dups: Vec<(String, usize)> = counts.into_iter().filter(|(_, n)| *n > 1).collect();
    dups.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    dups
}

/// Share (0-100) of non-empty values that belong to a recurring value
pub fn duplicate_rate(values: &[String]) -> f64 {
    let total = values.iter().filter_map(|v| dedup_key(v)).count();
    if total == 0 {
        return 0.0;
    }
    let duplicated: usize = duplicated_values(values).iter().map(|(_, n)| n).sum();
    100.0 * duplicated as f64 / total as f64
}

/// Percent of pages whose title check passes
pub struct TitlePassRateCheck;

impl CheckExecutor for TitlePassRateCheck {
    fn id(&self) -> &'static str {
        ids::TITLE_PASS_RATE
    }

    fn description(&self) -> &'static str {
        "Share of pages with a passing title"
    }

    fn evaluate_site(&self, site: &SiteInput<'_>) -> Result<Option<Evaluation>> {
        let scores = site.context().page_scores(ids::TITLE_QUALITY);
        if scores.is_empty() {
            return Ok(Some(Evaluation::not_applicable("no page title results")));
        }
        let passing = scores.iter().filter(|&&s| s >= PASS_CUTOFF).count();
        Ok(Some(
            Evaluation::scored(percent_passing(&scores, PASS_CUTOFF))
                .with_detail("pages", scores.len())
                .with_detail("passing", passing),
        ))
    }
}

/// 100 minus the duplicate rate of one page-level string detail
pub struct DuplicateDetailCheck {
    id: &'static str,
    description: &'static str,
    source_check: &'static str,
    detail_key: &'static str,
}

impl DuplicateDetailCheck {
    pub fn titles() -> Self {
        Self {
            id: ids::DUPLICATE_TITLES,
            description: "Page titles are unique across the site",
            source_check: ids::TITLE_QUALITY,
            detail_key: "title",
        }
    }

    pub fn descriptions() -> Self {
        Self {
            id: ids::DUPLICATE_DESCRIPTIONS,
            description: "Meta descriptions are unique across the site",
            source_check: ids::META_DESCRIPTION,
            detail_key: "description",
        }
    }
}

impl CheckExecutor for DuplicateDetailCheck {
    fn id(&self) -> &'static str {
        self.id
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn evaluate_site(&self, site: &SiteInput<'_>) -> Result<Option<Evaluation>> {
        let values = site.context().page_details(self.source_check, self.detail_key);
        if values.iter().all(|v| dedup_key(v).is_none()) {
            return Ok(Some(Evaluation::not_applicable(format!(
                "no page {} values",
                self.detail_key
            ))));
        }

        let rate = duplicate_rate(&values);
        let dups = duplicated_values(&values);
        Ok(Some(
            Evaluation::scored(100.0 - rate)
                .with_detail("values", values.len())
                .with_detail("duplicate_rate", crate::models::round1(rate))
                .with_detail("duplicate_groups", dups.len())
                .with_evidence_list(
                    dups.into_iter()
                        .take(5)
                        .map(|(value, n)| format!("\"{}\" used on {} pages", value, n)),
                ),
        ))
    }
}

/// Mean content-depth score across pages
pub struct ContentDepthMeanCheck;

impl CheckExecutor for ContentDepthMeanCheck {
    fn id(&self) -> &'static str {
        ids::CONTENT_DEPTH_MEAN
    }

    fn description(&self) -> &'static str {
        "Average content depth across pages"
    }

    fn evaluate_site(&self, site: &SiteInput<'_>) -> Result<Option<Evaluation>> {
        let scores = site.context().page_scores(ids::CONTENT_DEPTH);
        if scores.is_empty() {
            return Ok(Some(Evaluation::not_applicable("no page content depth results")));
        }
        Ok(Some(Evaluation::scored(mean(&scores)).with_detail("pages", scores.len())))
    }
}
