//! Whole-audit runner: parallel page phase, barrier, site phase, composite

use super::page::PageOrchestrator;
use super::site::{PageRef, SiteOrchestrator};
use super::resolve_workers;
use crate::catalog::CatalogSource;
use crate::checks::{ExecutorRegistry, Fetcher};
use crate::content::document::{choose_payload, truncate_html};
use crate::content::DocumentLimits;
use crate::models::{CheckResult, PageContext, SiteDescriptor};
use crate::scoring::{CompositeOutput, CompositeScorer};
use crate::store::ResultStore;
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Progress callback: (page id, completed, total)
pub type ProgressCallback = Arc<dyn Fn(&str, usize, usize) + Send + Sync>;

/// Everything one audit evaluates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditInput {
    pub audit_id: String,
    pub site: SiteDescriptor,
    pub pages: Vec<PageContext>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    pub page_id: String,
    pub url: String,
    pub results: Vec<CheckResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub audit_id: String,
    pub pages: Vec<PageReport>,
    pub site_results: Vec<CheckResult>,
    pub composite: CompositeOutput,
}

impl AuditReport {
    /// Page results of every page followed by the site results
    pub fn all_results(&self) -> Vec<CheckResult> {
        self.pages
            .iter()
            .flat_map(|p| p.results.iter().cloned())
            .chain(self.site_results.iter().cloned())
            .collect()
    }
}

pub struct AuditRunner {
    catalog: Arc<dyn CatalogSource>,
    registry: Arc<ExecutorRegistry>,
    store: Arc<dyn ResultStore>,
    fetcher: Arc<dyn Fetcher>,
    limits: DocumentLimits,
    workers: usize,
    progress_callback: Option<ProgressCallback>,
}

impl AuditRunner {
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        registry: Arc<ExecutorRegistry>,
        store: Arc<dyn ResultStore>,
        fetcher: Arc<dyn Fetcher>,
    ) -> Self {
        Self {
            catalog,
            registry,
            store,
            fetcher,
            limits: DocumentLimits::default(),
            workers: 0,
            progress_callback: None,
        }
    }

    /// Page worker count (0 = auto)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_limits(mut self, limits: DocumentLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn run(&self, input: &AuditInput) -> Result<AuditReport> {
        let start = Instant::now();
        let workers = resolve_workers(self.workers);
        info!(
            "Audit {}: {} pages on {} workers",
            input.audit_id,
            input.pages.len(),
            workers
        );

        let pages = PageOrchestrator::new(
            Arc::clone(&self.catalog),
            Arc::clone(&self.registry),
            Arc::clone(&self.store),
        )
        .with_limits(self.limits);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()?;

        let completed = AtomicUsize::new(0);
        let total = input.pages.len();
        // Join point: every page either persisted or the first failure is returned
        let page_reports: Vec<PageReport> = pool.install(|| {
            input
                .pages
                .par_iter()
                .map(|ctx| -> Result<PageReport> {
                    let results = pages
                        .evaluate(ctx)
                        .with_context(|| format!("Page {} failed", ctx.page_id))?;
                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    if let Some(ref callback) = self.progress_callback {
                        callback(&ctx.page_id, done, total);
                    }
                    Ok(PageReport {
                        page_id: ctx.page_id.clone(),
                        url: ctx.url.clone(),
                        results,
                    })
                })
                .collect::<Result<Vec<_>>>()
        })?;

        let refs: Vec<PageRef> = input
            .pages
            .iter()
            .map(|ctx| PageRef {
                page_id: ctx.page_id.clone(),
                url: ctx.url.clone(),
                html: choose_payload(ctx, &self.limits)
                    .1
                    .map(|html| truncate_html(html, self.limits.max_html_bytes).0.to_string()),
            })
            .collect();

        let site = SiteOrchestrator::new(
            Arc::clone(&self.catalog),
            Arc::clone(&self.registry),
            Arc::clone(&self.store),
            Arc::clone(&self.fetcher),
        )
        .with_limits(self.limits);
        let site_results = site
            .evaluate(&input.audit_id, &input.site, &refs)
            .with_context(|| format!("Site run for audit {} failed", input.audit_id))?;

        let catalog = self.catalog.load()?;
        let mut report = AuditReport {
            audit_id: input.audit_id.clone(),
            pages: page_reports,
            site_results,
            composite: CompositeOutput::default(),
        };
        report.composite = CompositeScorer::new(&catalog).score(&report.all_results());

        info!(
            "Audit {} complete: total {:.1} ({}) in {:?}",
            input.audit_id,
            report.composite.total,
            report.composite.grade,
            start.elapsed()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::checks::{ids, StaticFetcher};
    use crate::store::MemoryStore;
    use std::sync::Mutex;

    fn input() -> AuditInput {
        let site = SiteDescriptor {
            domain: "acme.com".into(),
            homepage_url: "https://acme.com/".into(),
            target_locale: Some("en-US".into()),
        };
        let pages = (0..4)
            .map(|i| PageContext {
                page_id: format!("p{}", i),
                url: if i == 0 {
                    "https://acme.com/".to_string()
                } else {
                    format!("https://acme.com/page-{}", i)
                },
                rendered_html: Some(format!(
                    "<html lang=\"en\"><head><title>Acme widgets page number {}</title></head>\
                     <body><h1>Page {}</h1><p>Some text.</p></body></html>",
                    i, i
                )),
                static_html: None,
                site: site.clone(),
            })
            .collect();
        AuditInput {
            audit_id: "audit-1".into(),
            site,
            pages,
        }
    }

    fn runner(store: Arc<MemoryStore>) -> AuditRunner {
        AuditRunner::new(
            Arc::new(StaticCatalog::builtin()),
            Arc::new(ExecutorRegistry::builtin()),
            store,
            Arc::new(StaticFetcher::offline()),
        )
        .with_workers(2)
    }

    #[test]
    fn test_audit_runs_pages_then_site() {
        let store = Arc::new(MemoryStore::new());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: ProgressCallback = Arc::new(move |_id: &str, done: usize, total: usize| {
            sink.lock().expect("lock").push((done, total));
        });

        let report = runner(store.clone())
            .with_progress_callback(callback)
            .run(&input())
            .expect("audit");

        assert_eq!(report.pages.len(), 4);
        assert_eq!(store.page_count(), 4);
        assert!(report.site_results.iter().any(|r| r.id == ids::TITLE_PASS_RATE));
        assert!(report.composite.total > 0.0);
        assert_eq!(seen.lock().expect("lock").len(), 4);

        let stored = store.load_for_audit("audit-1").expect("load");
        assert_eq!(stored, Some(report.site_results.clone()));
    }

    #[test]
    fn test_audit_is_idempotent() {
        let store = Arc::new(MemoryStore::new());
        let first = runner(store.clone()).run(&input()).expect("first");
        let second = runner(store.clone()).run(&input()).expect("second");
        assert_eq!(first.all_results(), second.all_results());
        assert_eq!(first.composite.total, second.composite.total);
        assert_eq!(store.page_count(), 4);
    }
}
