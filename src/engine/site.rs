//! Site evaluation orchestrator
//!
//! Runs after every page of the audit has persisted its results. The site
//! context is rebuilt from the store for the full page list; a page without
//! stored results blocks the run. Page HTML carried into the context is cut
//! to the same byte cap the page phase parses under.

use super::{drop_orphans, run_guarded};
use crate::catalog::CatalogSource;
use crate::checks::{ExecutorRegistry, Fetcher, SiteInput};
use crate::content::document::truncate_html;
use crate::content::DocumentLimits;
use crate::error::{EngineError, EngineResult};
use crate::models::{CheckResult, PageSummary, Scope, SiteContext, SiteDescriptor};
use crate::store::ResultStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// A page of the audit as the site run needs it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRef {
    pub page_id: String,
    pub url: String,
    #[serde(default)]
    pub html: Option<String>,
}

#[derive(Clone)]
pub struct SiteOrchestrator {
    catalog: Arc<dyn CatalogSource>,
    registry: Arc<ExecutorRegistry>,
    store: Arc<dyn ResultStore>,
    fetcher: Arc<dyn Fetcher>,
    limits: DocumentLimits,
}

impl SiteOrchestrator {
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
        }
    }

    pub fn with_limits(mut self, limits: DocumentLimits) -> Self {
        self.limits = limits;
        self
    }

    fn capped_html(&self, page: &PageRef) -> Option<String> {
        let html = page.html.as_deref()?;
        let (capped, truncated) = truncate_html(html, self.limits.max_html_bytes);
        if truncated {
            debug!(
                "Page {}: site-run HTML truncated from {} to {} bytes",
                page.page_id,
                html.len(),
                capped.len()
            );
        }
        Some(capped.to_string())
    }

    /// Build the site context from persisted page results.
    ///
    /// Fails with [`EngineError::PagesIncomplete`] if any page has no stored
    /// result array.
    pub fn build_context(
        &self,
        audit_id: &str,
        site: &SiteDescriptor,
        pages: &[PageRef],
    ) -> EngineResult<SiteContext> {
        let mut summaries = Vec::with_capacity(pages.len());
        let mut missing = Vec::new();
        for page in pages {
            match self.store.load_for_page(&page.page_id)? {
                Some(results) => summaries.push(PageSummary {
                    page_id: page.page_id.clone(),
                    url: page.url.clone(),
                    results,
                    html: self.capped_html(page),
                }),
                None => missing.push(page.page_id.clone()),
            }
        }
        if !missing.is_empty() {
            return Err(EngineError::PagesIncomplete {
                audit_id: audit_id.to_string(),
                missing,
            });
        }
        Ok(SiteContext {
            audit_id: audit_id.to_string(),
            site: site.clone(),
            pages: summaries,
        })
    }

    /// Load the catalog, evaluate the site and replace the audit's stored results
    pub fn evaluate(
        &self,
        audit_id: &str,
        site: &SiteDescriptor,
        pages: &[PageRef],
    ) -> EngineResult<Vec<CheckResult>> {
        let start = Instant::now();
        let catalog = self.catalog.load()?;
        let ctx = self.build_context(audit_id, site, pages)?;
        let input = SiteInput::new(&ctx, Arc::clone(&self.fetcher));

        let entity = format!("site {}", ctx.domain());
        let mut results = Vec::new();
        for criterion in catalog.for_scope(Scope::Site) {
            let Some(executor) = self.registry.get(&criterion.id) else {
                debug!("No executor registered for {}, skipping", criterion.id);
                continue;
            };
            if let Some(result) = run_guarded(criterion, &entity, || executor.evaluate_site(&input)) {
                results.push(result);
            }
        }
        let results = drop_orphans(&catalog, Scope::Site, &entity, results);

        self.store.save_for_audit(audit_id, &results)?;
        info!(
            "Site run for {} ({} pages): {} results in {:?}",
            ctx.domain(),
            ctx.pages.len(),
            results.len(),
            start.elapsed()
        );
        Ok(results)
    }
}
