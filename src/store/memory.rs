//! In-memory result store for tests and one-shot CLI runs

use super::ResultStore;
use crate::error::{EngineError, EngineResult};
use crate::models::CheckResult;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStore {
    pages: RwLock<HashMap<String, Vec<CheckResult>>>,
    audits: RwLock<HashMap<String, Vec<CheckResult>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages with stored results
    pub fn page_count(&self) -> usize {
        self.pages.read().map(|p| p.len()).unwrap_or(0)
    }
}

fn put(map: &RwLock<HashMap<String, Vec<CheckResult>>>, key: &str, results: &[CheckResult]) -> EngineResult<()> {
    let mut guard = map
        .write()
        .map_err(|_| EngineError::persistence(key, "store lock poisoned"))?;
    guard.insert(key.to_string(), results.to_vec());
    Ok(())
}

fn get(map: &RwLock<HashMap<String, Vec<CheckResult>>>, key: &str) -> EngineResult<Option<Vec<CheckResult>>> {
    let guard = map
        .read()
        .map_err(|_| EngineError::persistence(key, "store lock poisoned"))?;
    Ok(guard.get(key).cloned())
}

impl ResultStore for MemoryStore {
    fn save_for_page(&self, page_id: &str, results: &[CheckResult]) -> EngineResult<()> {
        put(&self.pages, page_id, results)
    }

    fn save_for_audit(&self, audit_id: &str, results: &[CheckResult]) -> EngineResult<()> {
        put(&self.audits, audit_id, results)
    }

    fn load_for_page(&self, page_id: &str) -> EngineResult<Option<Vec<CheckResult>>> {
        get(&self.pages, page_id)
    }

    fn load_for_audit(&self, audit_id: &str) -> EngineResult<Option<Vec<CheckResult>>> {
        get(&self.audits, audit_id)
    }
}
