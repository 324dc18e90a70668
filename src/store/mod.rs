//! Result persistence
//!
//! Each save replaces the whole stored array for its entity in one atomic
//! write; there is no partial append. Failures propagate and abort the run.

mod memory;
mod redb_store;

pub use memory::MemoryStore;
pub use redb_store::{RedbStore, DEFAULT_DB_FILE};

use crate::error::EngineResult;
use crate::models::CheckResult;

/// Storage seam for page and audit result arrays
pub trait ResultStore: Send + Sync {
    /// Replace the page-level results of `page_id`
    fn save_for_page(&self, page_id: &str, results: &[CheckResult]) -> EngineResult<()>;

    /// Replace the site-level results of `audit_id`
    fn save_for_audit(&self, audit_id: &str, results: &[CheckResult]) -> EngineResult<()>;

    /// Page results, `None` if the page was never evaluated
    fn load_for_page(&self, page_id: &str) -> EngineResult<Option<Vec<CheckResult>>>;

    /// Site results, `None` if the audit's site run never completed
    fn load_for_audit(&self, audit_id: &str) -> EngineResult<Option<Vec<CheckResult>>>;
}
