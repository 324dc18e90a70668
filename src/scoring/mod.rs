//! Composite scoring
//!
//! Folds per-criterion results into page, site and overall scores.
//!
//! # Scoring Formula
//!
//! ```text
//! score(group) = Σ(score × weight) / Σ weight      (0 when Σ weight = 0)
//!
//! groups: page results of every page, site results, and both together
//! ```
//!
//! Only enabled, non-preview criteria contribute. Exposed scores are rounded
//! to one decimal; the letter grade is taken from the rounded total.

mod composite;

pub use composite::{
    grade_for, Breakdown, CompositeCounts, CompositeOutput, CompositeScorer, ScopeBreakdown,
};
