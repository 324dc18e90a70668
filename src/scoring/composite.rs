//! Weighted composite scorer

use crate::catalog::Catalog;
use crate::models::{round1, CheckResult, Scope};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

/// Weighted totals of one grouping
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeBreakdown {
    pub total_weight: f64,
    pub weighted_sum: f64,
    pub check_count: usize,
}

impl ScopeBreakdown {
    fn add(&mut self, score: f64, weight: f64) {
        self.total_weight += weight;
        self.weighted_sum += score * weight;
        self.check_count += 1;
    }

    /// Weighted mean, 0 when nothing carries weight
    pub fn score(&self) -> f64 {
        if self.total_weight > 0.0 {
            self.weighted_sum / self.total_weight
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub page: ScopeBreakdown,
    pub site: ScopeBreakdown,
    pub overall: ScopeBreakdown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeCounts {
    /// Results that counted toward the composite
    pub included: usize,
    /// Distinct preview criteria that produced at least one result
    pub preview: usize,
    /// Disabled criteria in the whole catalog
    pub disabled: usize,
}

/// Audit-level composite
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositeOutput {
    pub total: f64,
    pub page_score: f64,
    pub site_score: f64,
    pub grade: String,
    pub counts: CompositeCounts,
    pub breakdown: Breakdown,
}

/// Letter grade for a 0-100 score
pub fn grade_for(score: f64) -> &'static str {
    if score >= 90.0 {
        "A"
    } else if score >= 80.0 {
        "B"
    } else if score >= 70.0 {
        "C"
    } else if score >= 60.0 {
        "D"
    } else {
        "F"
    }
}

/// Folds results into a composite against one catalog load
pub struct CompositeScorer<'a> {
    catalog: &'a Catalog,
}

impl<'a> CompositeScorer<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Score `results` (page results of every page plus the site results).
    ///
    /// Results of disabled, unknown or preview criteria never contribute,
    /// whatever their score.
    pub fn score(&self, results: &[CheckResult]) -> CompositeOutput {
        let mut breakdown = Breakdown::default();
        let mut preview_ids = BTreeSet::new();
        let mut excluded = 0usize;

        for result in results {
            let Some(criterion) = self.catalog.get(&result.id) else {
                excluded += 1;
                continue;
            };
            if criterion.preview {
                preview_ids.insert(criterion.id.as_str());
                continue;
            }
            match criterion.scope {
                Scope::Page => breakdown.page.add(result.score, criterion.weight),
                Scope::Site => breakdown.site.add(result.score, criterion.weight),
            }
            breakdown.overall.add(result.score, criterion.weight);
        }

        if excluded > 0 {
            debug!("Composite ignored {} results of disabled or unknown criteria", excluded);
        }

        let total = round1(breakdown.overall.score());
        CompositeOutput {
            total,
            page_score: round1(breakdown.page.score()),
            site_score: round1(breakdown.site.score()),
            grade: grade_for(total).to_string(),
            counts: CompositeCounts {
                included: breakdown.overall.check_count,
                preview: preview_ids.len(),
                disabled: self.catalog.disabled_count(),
            },
            breakdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Criterion, Evaluation};

    fn result(criterion: &Criterion, score: f64) -> CheckResult {
        CheckResult::finalize(criterion, Evaluation::scored(score))
    }

    #[test]
    fn test_weighted_mean_per_scope() {
        let a = Criterion::new("A", Scope::Page).with_weight(3.0);
        let b = Criterion::new("B", Scope::Page).with_weight(1.0);
        let s = Criterion::new("S", Scope::Site).with_weight(2.0);
        let catalog = Catalog::from_records("t", vec![a.clone(), b.clone(), s.clone()]).unwrap();

        let out = CompositeScorer::new(&catalog).score(&[result(&a, 100.0), result(&b, 0.0), result(&s, 50.0)]);
        assert_eq!(out.page_score, 75.0);
        assert_eq!(out.site_score, 50.0);
        // (300 + 0 + 100) / 6
        assert_eq!(out.total, 66.7);
        assert_eq!(out.grade, "D");
        assert_eq!(out.breakdown.overall.total_weight, 6.0);
        assert_eq!(out.counts.included, 3);
    }

    #[test]
    fn test_disabled_and_preview_excluded() {
        let a = Criterion::new("A", Scope::Page);
        let off = Criterion::new("OFF", Scope::Page).disabled();
        let pv = Criterion::new("PV", Scope::Page).as_preview();
        let catalog = Catalog::from_records("t", vec![a.clone(), off.clone(), pv.clone()]).unwrap();

        let out = CompositeScorer::new(&catalog).score(&[
            result(&a, 80.0),
            result(&off, 0.0),
            result(&pv, 0.0),
            result(&pv, 10.0),
            result(&Criterion::new("GONE", Scope::Site), 0.0),
        ]);
        assert_eq!(out.total, 80.0);
        assert_eq!(out.site_score, 0.0);
        assert_eq!(out.counts.included, 1);
        assert_eq!(out.counts.preview, 1);
        assert_eq!(out.counts.disabled, 1);
    }

    #[test]
    fn test_empty_is_zero() {
        let catalog = Catalog::default();
        let out = CompositeScorer::new(&catalog).score(&[]);
        assert_eq!(out.total, 0.0);
        assert_eq!(out.grade, "F");
    }

    #[test]
    fn test_grades() {
        assert_eq!(grade_for(95.0), "A");
        assert_eq!(grade_for(80.0), "B");
        assert_eq!(grade_for(79.9), "C");
        assert_eq!(grade_for(60.0), "D");
        assert_eq!(grade_for(12.0), "F");
    }
}
