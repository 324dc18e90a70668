//! redb-backed result store
//!
//! One table per entity kind; the key is the page or audit id and the value
//! is the JSON-serialized result array.

use super::ResultStore;
use crate::error::{EngineError, EngineResult};
use crate::models::CheckResult;
use redb::{Database, ReadableTable, TableDefinition};
use std::path::{Path, PathBuf};
use tracing::debug;

type ResultTable = TableDefinition<'static, &'static str, &'static [u8]>;

const PAGE_RESULTS: ResultTable = TableDefinition::new("page_results");
const AUDIT_RESULTS: ResultTable = TableDefinition::new("audit_results");

pub const DEFAULT_DB_FILE: &str = "results.redb";

pub struct RedbStore {
    db: Database,
    path: PathBuf,
}

impl RedbStore {
    /// Open or create the database file, creating parent directories
    pub fn open(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| EngineError::persistence(path.display().to_string(), e))?;
        }
        let db = Database::create(&path)
            .map_err(|e| EngineError::persistence(path.display().to_string(), e))?;
        debug!("Opened result store at {}", path.display());
        Ok(Self { db, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, table: ResultTable, kind: &str, key: &str, results: &[CheckResult]) -> EngineResult<()> {
        let entity = format!("{} {}", kind, key);
        let err = |e: &dyn std::fmt::Display| EngineError::persistence(entity.clone(), e);

        let value = serde_json::to_vec(results).map_err(|e| err(&e))?;
        let write_txn = self.db.begin_write().map_err(|e| err(&e))?;
        {
            let mut t = write_txn.open_table(table).map_err(|e| err(&e))?;
            t.insert(key, value.as_slice()).map_err(|e| err(&e))?;
        }
        write_txn.commit().map_err(|e| err(&e))?;
        debug!("Saved {} results for {}", results.len(), entity);
        Ok(())
    }

    fn load(&self, table: ResultTable, kind: &str, key: &str) -> EngineResult<Option<Vec<CheckResult>>> {
        let entity = format!("{} {}", kind, key);
        let err = |e: &dyn std::fmt::Display| EngineError::persistence(entity.clone(), e);

        let read_txn = self.db.begin_read().map_err(|e| err(&e))?;
        let t = match read_txn.open_table(table) {
            Ok(t) => t,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(err(&e)),
        };
        match t.get(key).map_err(|e| err(&e))? {
            Some(value) => {
                let results: Vec<CheckResult> = serde_json::from_slice(value.value()).map_err(|e| err(&e))?;
                Ok(Some(results))
            }
            None => Ok(None),
        }
    }
}

impl ResultStore for RedbStore {
    fn save_for_page(&self, page_id: &str, results: &[CheckResult]) -> EngineResult<()> {
        self.save(PAGE_RESULTS, "page", page_id, results)
    }

    fn save_for_audit(&self, audit_id: &str, results: &[CheckResult]) -> EngineResult<()> {
        self.save(AUDIT_RESULTS, "audit", audit_id, results)
    }

    fn load_for_page(&self, page_id: &str) -> EngineResult<Option<Vec<CheckResult>>> {
        self.load(PAGE_RESULTS, "page", page_id)
    }

    fn load_for_audit(&self, audit_id: &str) -> EngineResult<Option<Vec<CheckResult>>> {
        self.load(AUDIT_RESULTS, "audit", audit_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Criterion, Evaluation, Scope};

    fn result(id: &str, score: f64) -> CheckResult {
        CheckResult::finalize(
            &Criterion::new(id, Scope::Page),
            Evaluation::scored(score).with_detail("title", "Acme").with_evidence("e"),
        )
    }

    #[test]
    fn test_round_trip_and_overwrite() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = RedbStore::open(dir.path().join("nested").join(DEFAULT_DB_FILE)).expect("open");

        assert_eq!(store.load_for_page("p1").expect("load"), None);

        let first = vec![result("C1_title_quality", 90.0), result("C3_canonical", 40.0)];
        store.save_for_page("p1", &first).expect("save");
        assert_eq!(store.load_for_page("p1").expect("load"), Some(first));

        let second = vec![result("C1_title_quality", 10.0)];
        store.save_for_page("p1", &second).expect("save");
        assert_eq!(store.load_for_page("p1").expect("load"), Some(second));

        // Page and audit keys live in separate tables
        assert_eq!(store.load_for_audit("p1").expect("load"), None);
    }

    #[test]
    fn test_reopen_keeps_data() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(DEFAULT_DB_FILE);
        {
            let store = RedbStore::open(&path).expect("open");
            store.save_for_audit("a1", &[result("S1_sitemap", 75.0)]).expect("save");
        }
        let store = RedbStore::open(&path).expect("reopen");
        let loaded = store.load_for_audit("a1").expect("load").expect("present");
        assert_eq!(loaded[0].score, 75.0);
    }
}
