//! Evaluation pipeline
//!
//! ```text
//! Catalog ──► PageOrchestrator × N (parallel, rayon) ──► store
//!                                                          │
//!                                  barrier: every page persisted
//!                                                          ▼
//!                                  SiteOrchestrator ──► store
//!                                                          │
//!                                                          ▼
//!                                                  CompositeScorer
//! ```
//!
//! One executor's failure or panic never aborts a run; it becomes an
//! `error` result on its own criterion. Catalog and persistence failures are
//! fatal.

mod audit;
mod page;
mod site;

pub use audit::{AuditInput, AuditReport, AuditRunner, PageReport, ProgressCallback};
pub use page::PageOrchestrator;
pub use site::{PageRef, SiteOrchestrator};

use crate::catalog::Catalog;
use crate::models::{CheckResult, Criterion, Evaluation, Scope};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, error, warn};

/// Worker count for the page pool: 0 means auto-detect, capped at 16
pub fn resolve_workers(workers: usize) -> usize {
    if workers == 0 {
        std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(4)
            .min(16)
    } else {
        workers
    }
}

/// Run one executor call with error and panic containment.
///
/// `Ok(None)` (absent) yields `None`; an `Err` or a panic yields an `error`
/// result stamped with the criterion's metadata.
pub(crate) fn run_guarded<F>(criterion: &Criterion, entity: &str, evaluate: F) -> Option<CheckResult>
where
    F: FnOnce() -> anyhow::Result<Option<Evaluation>>,
{
    let start = Instant::now();
    let outcome = catch_unwind(AssertUnwindSafe(evaluate));
    let elapsed = start.elapsed().as_millis();

    match outcome {
        Ok(Ok(Some(evaluation))) => {
            let result = CheckResult::finalize(criterion, evaluation);
            debug!(
                "{} on {}: {:.1} ({}) in {}ms",
                criterion.id, entity, result.score, result.status, elapsed
            );
            Some(result)
        }
        Ok(Ok(None)) => {
            debug!("{} on {}: not applicable, omitted", criterion.id, entity);
            None
        }
        Ok(Err(e)) => {
            warn!("{} on {} failed: {:#}", criterion.id, entity, e);
            Some(CheckResult::errored(criterion, e.to_string()))
        }
        Err(panic_info) => {
            let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            error!("{} on {} panicked: {}", criterion.id, entity, panic_msg);
            Some(CheckResult::errored(criterion, format!("Panic: {}", panic_msg)))
        }
    }
}

/// Drop results whose id is not an enabled criterion of `scope` in `catalog`
pub(crate) fn drop_orphans(catalog: &Catalog, scope: Scope, entity: &str, results: Vec<CheckResult>) -> Vec<CheckResult> {
    results
        .into_iter()
        .filter(|r| {
            let known = catalog.get(&r.id).is_some_and(|c| c.scope == scope);
            if !known {
                warn!("Dropping orphaned result {} for {}", r.id, entity);
            }
            known
        })
        .collect()
}
