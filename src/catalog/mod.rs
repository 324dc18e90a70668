//! Criterion catalog
//!
//! The catalog is the externally managed table of criteria. It is loaded at
//! the start of every page or site run and never cached across runs, so
//! edits to the source take effect on the next run.
//!
//! Only enabled criteria are visible through [`Catalog`]; absence means
//! "do not run, do not aggregate".

mod defaults;
mod file;

pub use defaults::default_criteria;
pub use file::{write_catalog, CatalogFile, FileCatalog};

use crate::error::{EngineError, EngineResult};
use crate::models::{Criterion, Scope};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Where criteria come from
pub trait CatalogSource: Send + Sync {
    /// Human-readable source name for logs and errors
    fn name(&self) -> String;

    /// Read and validate the full table. Failure is fatal for the run.
    fn load(&self) -> EngineResult<Catalog>;
}

/// Enabled criteria of one load, plus counts over the full table
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    enabled: HashMap<String, Criterion>,
    disabled_count: usize,
}

impl Catalog {
    /// Validate `records` and keep the enabled ones
    pub fn from_records(source_name: &str, records: Vec<Criterion>) -> EngineResult<Self> {
        let mut seen = HashSet::new();
        for criterion in &records {
            validate(criterion)?;
            if !seen.insert(criterion.id.as_str()) {
                return Err(EngineError::Catalog {
                    source_name: source_name.to_string(),
                    message: format!("duplicate criterion id {}", criterion.id),
                });
            }
        }

        let total = records.len();
        let enabled: HashMap<String, Criterion> = records
            .into_iter()
            .filter(|c| c.enabled)
            .map(|c| (c.id.clone(), c))
            .collect();
        let disabled_count = total - enabled.len();
        debug!(
            "Catalog {}: {} enabled, {} disabled",
            source_name,
            enabled.len(),
            disabled_count
        );
        Ok(Self {
            enabled,
            disabled_count,
        })
    }

    /// Enabled criterion by id
    pub fn get(&self, id: &str) -> Option<&Criterion> {
        self.enabled.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.enabled.contains_key(id)
    }

    /// Enabled criteria of one scope, by display order then id
    pub fn for_scope(&self, scope: Scope) -> Vec<&Criterion> {
        let mut list: Vec<&Criterion> = self.enabled.values().filter(|c| c.scope == scope).collect();
        list.sort_by(|a, b| a.display_order.cmp(&b.display_order).then_with(|| a.id.cmp(&b.id)));
        list
    }

    /// All enabled criteria, page scope first, then by display order and id
    pub fn ordered(&self) -> Vec<&Criterion> {
        let mut list = self.for_scope(Scope::Page);
        list.extend(self.for_scope(Scope::Site));
        list
    }

    pub fn len(&self) -> usize {
        self.enabled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }

    /// Disabled criteria in the whole table
    pub fn disabled_count(&self) -> usize {
        self.disabled_count
    }
}

fn validate(criterion: &Criterion) -> EngineResult<()> {
    let invalid = |reason: String| EngineError::InvalidCriterion {
        id: criterion.id.clone(),
        reason,
    };
    if criterion.id.trim().is_empty() {
        return Err(invalid("empty id".to_string()));
    }
    if !(criterion.weight.is_finite() && criterion.weight > 0.0) {
        return Err(invalid(format!("weight must be positive, got {}", criterion.weight)));
    }
    for (name, value) in [
        ("pass_threshold", criterion.pass_threshold),
        ("warn_threshold", criterion.warn_threshold),
    ] {
        if !(0.0..=100.0).contains(&value) {
            return Err(invalid(format!("{} must be within 0-100, got {}", name, value)));
        }
    }
    if criterion.warn_threshold > criterion.pass_threshold {
        return Err(invalid(format!(
            "warn_threshold {} is above pass_threshold {}",
            criterion.warn_threshold, criterion.pass_threshold
        )));
    }
    Ok(())
}

/// In-memory catalog, for embedding and tests
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    criteria: Vec<Criterion>,
}

impl StaticCatalog {
    pub fn new(criteria: Vec<Criterion>) -> Self {
        Self { criteria }
    }

    /// The built-in table
    pub fn builtin() -> Self {
        Self::new(default_criteria())
    }
}

impl CatalogSource for StaticCatalog {
    fn name(&self) -> String {
        "built-in catalog".to_string()
    }

    fn load(&self) -> EngineResult<Catalog> {
        Catalog::from_records(&self.name(), self.criteria.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_enabled_are_visible() {
        let catalog = Catalog::from_records(
            "test",
            vec![
                Criterion::new("A", Scope::Page),
                Criterion::new("B", Scope::Page).disabled(),
                Criterion::new("C", Scope::Site).as_preview(),
            ],
        )
        .unwrap();
        assert!(catalog.contains("A"));
        assert!(!catalog.contains("B"));
        assert!(catalog.contains("C"));
        assert_eq!(catalog.disabled_count(), 1);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_scope_ordering() {
        let catalog = Catalog::from_records(
            "test",
            vec![
                Criterion::new("Z", Scope::Page).with_order(1),
                Criterion::new("B", Scope::Page).with_order(2),
                Criterion::new("A", Scope::Page).with_order(2),
                Criterion::new("S", Scope::Site),
            ],
        )
        .unwrap();
        let ids: Vec<&str> = catalog.for_scope(Scope::Page).iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["Z", "A", "B"]);
        assert_eq!(catalog.ordered().last().map(|c| c.id.as_str()), Some("S"));
    }

    #[test]
    fn test_validation_rejects_bad_records() {
        let bad = [
            Criterion::new("w", Scope::Page).with_weight(0.0),
            Criterion::new("t", Scope::Page).with_thresholds(120.0, 50.0),
            Criterion::new("o", Scope::Page).with_thresholds(50.0, 70.0),
        ];
        for criterion in bad {
            let err = Catalog::from_records("test", vec![criterion]).unwrap_err();
            assert!(matches!(err, EngineError::InvalidCriterion { .. }));
        }

        let dup = Catalog::from_records(
            "test",
            vec![Criterion::new("A", Scope::Page), Criterion::new("A", Scope::Site)],
        );
        assert!(matches!(dup, Err(EngineError::Catalog { .. })));
    }

    #[test]
    fn test_builtin_catalog_loads() {
        let catalog = StaticCatalog::builtin().load().unwrap();
        assert!(catalog.contains("C1_title_quality"));
        assert!(catalog.contains("S2_bot_access"));
    }
}
