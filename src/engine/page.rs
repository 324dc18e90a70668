//! Page evaluation orchestrator

use super::{drop_orphans, run_guarded};
use crate::catalog::{Catalog, CatalogSource};
use crate::checks::ExecutorRegistry;
use crate::content::{DocumentLimits, PageDocument};
use crate::error::EngineResult;
use crate::models::{CheckResult, PageContext, Scope};
use crate::store::ResultStore;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Runs every enabled page criterion against one page and persists the array
#[derive(Clone)]
pub struct PageOrchestrator {
    catalog: Arc<dyn CatalogSource>,
    registry: Arc<ExecutorRegistry>,
    store: Arc<dyn ResultStore>,
    limits: DocumentLimits,
}

impl PageOrchestrator {
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        registry: Arc<ExecutorRegistry>,
        store: Arc<dyn ResultStore>,
    ) -> Self {
        Self {
            catalog,
            registry,
            store,
            limits: DocumentLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: DocumentLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Load the catalog, evaluate the page and replace its stored results
    pub fn evaluate(&self, ctx: &PageContext) -> EngineResult<Vec<CheckResult>> {
        let start = Instant::now();
        let catalog = self.catalog.load()?;
        let results = self.evaluate_with(&catalog, ctx);
        self.store.save_for_page(&ctx.page_id, &results)?;
        debug!(
            "Page {} evaluated: {} results in {:?}",
            ctx.page_id,
            results.len(),
            start.elapsed()
        );
        Ok(results)
    }

    /// Evaluate against an already loaded catalog, without persisting
    pub fn evaluate_with(&self, catalog: &Catalog, ctx: &PageContext) -> Vec<CheckResult> {
        let doc = PageDocument::from_context(ctx, &self.limits);
        if !doc.has_html() {
            debug!("Page {} has no HTML payload", ctx.page_id);
        }

        let mut results = Vec::new();
        for criterion in catalog.for_scope(Scope::Page) {
            let Some(executor) = self.registry.get(&criterion.id) else {
                debug!("No executor registered for {}, skipping", criterion.id);
                continue;
            };
            if let Some(result) = run_guarded(criterion, &ctx.page_id, || executor.evaluate_page(&doc)) {
                results.push(result);
            }
        }
        drop_orphans(catalog, Scope::Page, &ctx.page_id, results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::checks::CheckExecutor;
    use crate::models::{CheckStatus, Criterion, Evaluation, SiteDescriptor};
    use crate::store::MemoryStore;

    struct Fixed(&'static str, f64);

    impl CheckExecutor for Fixed {
        fn id(&self) -> &'static str {
            self.0
        }
        fn description(&self) -> &'static str {
            "fixed score"
        }
        fn evaluate_page(&self, _doc: &PageDocument) -> anyhow::Result<Option<Evaluation>> {
            Ok(Some(Evaluation::scored(self.1)))
        }
    }

    struct Exploding;

    impl CheckExecutor for Exploding {
        fn id(&self) -> &'static str {
            "BOOM"
        }
        fn description(&self) -> &'static str {
            "always panics"
        }
        fn evaluate_page(&self, _doc: &PageDocument) -> anyhow::Result<Option<Evaluation>> {
            panic!("executor exploded")
        }
    }

    fn ctx() -> PageContext {
        PageContext {
            page_id: "p1".into(),
            url: "https://acme.com/".into(),
            rendered_html: Some("<html><head><title>Acme</title></head></html>".into()),
            static_html: None,
            site: SiteDescriptor::default(),
        }
    }

    #[test]
    fn test_one_result_per_enabled_criterion() {
        let catalog = StaticCatalog::new(vec![
            Criterion::new("A", Scope::Page).with_order(2).with_thresholds(50.0, 20.0),
            Criterion::new("B", Scope::Page).with_order(1),
            Criterion::new("OFF", Scope::Page).disabled(),
            Criterion::new("NO_EXECUTOR", Scope::Page),
            Criterion::new("BOOM", Scope::Page).with_order(3),
            Criterion::new("SITE", Scope::Site),
        ]);
        let registry = ExecutorRegistry::new()
            .with(Arc::new(Fixed("A", 70.0)))
            .with(Arc::new(Fixed("B", 10.0)))
            .with(Arc::new(Fixed("OFF", 100.0)))
            .with(Arc::new(Fixed("SITE", 100.0)))
            .with(Arc::new(Exploding));
        let store = Arc::new(MemoryStore::new());
        let orchestrator = PageOrchestrator::new(Arc::new(catalog), Arc::new(registry), store.clone());

        let results = orchestrator.evaluate(&ctx()).expect("page run");
        let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A", "BOOM"]);
        assert_eq!(results[0].status, CheckStatus::Fail);
        assert_eq!(results[1].status, CheckStatus::Ok);
        assert_eq!(results[2].status, CheckStatus::Error);

        assert_eq!(store.load_for_page("p1").expect("load"), Some(results));
    }

    #[test]
    fn test_catalog_failure_is_fatal() {
        let orchestrator = PageOrchestrator::new(
            Arc::new(crate::catalog::FileCatalog::new("/nonexistent/criteria.toml")),
            Arc::new(ExecutorRegistry::builtin()),
            Arc::new(MemoryStore::new()),
        );
        assert!(orchestrator.evaluate(&ctx()).is_err());
    }
}
