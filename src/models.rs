//! Core data models for sitegrade
//!
//! These models are shared by the catalog, the executors, the orchestrators
//! and the composite scorer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether a criterion applies to a single page or to the whole site
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Page,
    Site,
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::Page => write!(f, "page"),
            Scope::Site => write!(f, "site"),
        }
    }
}

/// How an executor gathers its signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CheckType {
    #[default]
    DomBased,
    NetworkBased,
    Aggregate,
    ModelBased,
}

/// Relative importance of a criterion, copied into its results
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Impact::Low => write!(f, "low"),
            Impact::Medium => write!(f, "medium"),
            Impact::High => write!(f, "high"),
        }
    }
}

/// Outcome status of one check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Ok,
    Warn,
    Fail,
    NotApplicable,
    Error,
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Ok => write!(f, "ok"),
            CheckStatus::Warn => write!(f, "warn"),
            CheckStatus::Fail => write!(f, "fail"),
            CheckStatus::NotApplicable => write!(f, "not_applicable"),
            CheckStatus::Error => write!(f, "error"),
        }
    }
}

pub const DEFAULT_PASS_THRESHOLD: f64 = 85.0;
pub const DEFAULT_WARN_THRESHOLD: f64 = 60.0;

fn default_weight() -> f64 {
    1.0
}

fn default_pass() -> f64 {
    DEFAULT_PASS_THRESHOLD
}

fn default_warn() -> f64 {
    DEFAULT_WARN_THRESHOLD
}

fn default_true() -> bool {
    true
}

/// An externally managed rule definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub scope: Scope,
    #[serde(default)]
    pub check_type: CheckType,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub preview: bool,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default = "default_pass")]
    pub pass_threshold: f64,
    #[serde(default = "default_warn")]
    pub warn_threshold: f64,
    #[serde(default)]
    pub display_order: u32,
    #[serde(default)]
    pub impact: Impact,
}

impl Criterion {
    pub fn new(id: impl Into<String>, scope: Scope) -> Self {
        Self {
            id: id.into(),
            label: String::new(),
            scope,
            check_type: CheckType::DomBased,
            enabled: true,
            preview: false,
            weight: 1.0,
            pass_threshold: DEFAULT_PASS_THRESHOLD,
            warn_threshold: DEFAULT_WARN_THRESHOLD,
            display_order: 0,
            impact: Impact::Medium,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_check_type(mut self, check_type: CheckType) -> Self {
        self.check_type = check_type;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_thresholds(mut self, pass: f64, warn: f64) -> Self {
        self.pass_threshold = pass;
        self.warn_threshold = warn;
        self
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.display_order = order;
        self
    }

    pub fn with_impact(mut self, impact: Impact) -> Self {
        self.impact = impact;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn as_preview(mut self) -> Self {
        self.preview = true;
        self
    }

    /// Status for a score against this criterion's thresholds.
    ///
    /// Monotonic: a higher score never yields a worse status.
    pub fn status_for(&self, score: f64) -> CheckStatus {
        if score >= self.pass_threshold {
            CheckStatus::Ok
        } else if score >= self.warn_threshold {
            CheckStatus::Warn
        } else {
            CheckStatus::Fail
        }
    }
}

/// Clamp a raw score into [0, 100], mapping NaN to 0
pub fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Raw output of an executor, before the orchestrator finalizes it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Evaluation {
    pub score: f64,
    /// Explicit status (`not_applicable` / `error`); `None` means derive from thresholds
    pub status: Option<CheckStatus>,
    pub details: BTreeMap<String, serde_json::Value>,
    pub evidence: Vec<String>,
}

impl Evaluation {
    pub fn scored(score: f64) -> Self {
        Self {
            score,
            ..Default::default()
        }
    }

    pub fn not_applicable(reason: impl Into<String>) -> Self {
        Self {
            score: 0.0,
            status: Some(CheckStatus::NotApplicable),
            ..Default::default()
        }
        .with_detail("reason", reason.into())
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn with_evidence(mut self, item: impl Into<String>) -> Self {
        self.evidence.push(item.into());
        self
    }

    pub fn with_evidence_list(mut self, items: impl IntoIterator<Item = String>) -> Self {
        self.evidence.extend(items);
        self
    }
}

/// Outcome of one executor run for one criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub id: String,
    pub scope: Scope,
    pub score: f64,
    pub status: CheckStatus,
    #[serde(default)]
    pub details: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<String>,
    #[serde(default)]
    pub preview: bool,
    #[serde(default)]
    pub impact: Impact,
}

impl CheckResult {
    /// Finalize an executor's evaluation against its criterion
    pub fn finalize(criterion: &Criterion, evaluation: Evaluation) -> Self {
        let score = clamp_score(evaluation.score);
        let status = evaluation
            .status
            .unwrap_or_else(|| criterion.status_for(score));
        Self {
            id: criterion.id.clone(),
            scope: criterion.scope,
            score,
            status,
            details: evaluation.details,
            evidence: evaluation.evidence,
            preview: criterion.preview,
            impact: criterion.impact,
        }
    }

    /// Result recorded when an executor failed
    pub fn errored(criterion: &Criterion, message: impl Into<String>) -> Self {
        let mut details = BTreeMap::new();
        details.insert(
            "error".to_string(),
            serde_json::Value::String(message.into()),
        );
        Self {
            id: criterion.id.clone(),
            scope: criterion.scope,
            score: 0.0,
            status: CheckStatus::Error,
            details,
            evidence: Vec::new(),
            preview: criterion.preview,
            impact: criterion.impact,
        }
    }

    /// String detail, if present
    pub fn detail_str(&self, key: &str) -> Option<&str> {
        self.details.get(key).and_then(|v| v.as_str())
    }
}

/// Site-level facts every page run needs
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SiteDescriptor {
    pub domain: String,
    #[serde(default)]
    pub homepage_url: String,
    #[serde(default)]
    pub target_locale: Option<String>,
}

/// One page handed over by the crawling pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageContext {
    pub page_id: String,
    pub url: String,
    #[serde(default)]
    pub rendered_html: Option<String>,
    #[serde(default)]
    pub static_html: Option<String>,
    pub site: SiteDescriptor,
}

/// A page as seen by the site run: its persisted results plus optional HTML
#[derive(Debug, Clone, Default)]
pub struct PageSummary {
    pub page_id: String,
    pub url: String,
    pub results: Vec<CheckResult>,
    pub html: Option<String>,
}

impl PageSummary {
    /// This page's result for a page-level check id
    pub fn result(&self, check_id: &str) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.id == check_id)
    }
}

/// Everything the site run evaluates
#[derive(Debug, Clone, Default)]
pub struct SiteContext {
    pub audit_id: String,
    pub site: SiteDescriptor,
    pub pages: Vec<PageSummary>,
}

impl SiteContext {
    pub fn domain(&self) -> &str {
        &self.site.domain
    }

    /// Per-page scores for one page-level check, skipping errored runs
    pub fn page_scores(&self, check_id: &str) -> Vec<f64> {
        self.pages
            .iter()
            .filter_map(|p| p.result(check_id))
            .filter(|r| r.status != CheckStatus::Error)
            .map(|r| r.score)
            .collect()
    }

    /// Per-page string details for one page-level check
    pub fn page_details(&self, check_id: &str, key: &str) -> Vec<String> {
        self.pages
            .iter()
            .filter_map(|p| p.result(check_id))
            .filter_map(|r| r.detail_str(key))
            .map(str::to_string)
            .collect()
    }
}
