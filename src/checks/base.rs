//! Base executor trait and the site evaluation input
//!
//! This module defines the core abstractions every check builds on:
//! - `CheckExecutor` trait that all executors implement
//! - `SiteInput` carrying the site context plus shared network state

use super::network::{FetchResponse, Fetcher};
use super::robots::RobotsTxt;
use crate::content::PageDocument;
use crate::models::{Evaluation, SiteContext};
use anyhow::Result;
use std::cell::OnceCell;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Trait for all check executors
///
/// An executor fulfils one criterion id. It may evaluate a page, a site, or
/// both; the default implementations return `Ok(None)` ("absent"), which the
/// orchestrators simply omit.
///
/// # Example Implementation
///
/// ```ignore
/// pub struct MyCheck;
///
/// impl CheckExecutor for MyCheck {
///     fn id(&self) -> &'static str {
///         "C99_my_check"
///     }
///
///     fn description(&self) -> &'static str {
///         "Checks my specific page property"
///     }
///
///     fn evaluate_page(&self, doc: &PageDocument) -> Result<Option<Evaluation>> {
///         Ok(Some(Evaluation::scored(100.0)))
///     }
/// }
/// ```
pub trait CheckExecutor: Send + Sync {
    /// Criterion id this executor fulfils (e.g. "C1_title_quality")
    fn id(&self) -> &'static str;

    /// Human-readable description of what this executor measures
    fn description(&self) -> &'static str;

    /// Evaluate one page. `Ok(None)` means the check does not apply.
    fn evaluate_page(&self, _doc: &PageDocument) -> Result<Option<Evaluation>> {
        Ok(None)
    }

    /// Evaluate the whole site. `Ok(None)` means the check does not apply.
    fn evaluate_site(&self, _site: &SiteInput<'_>) -> Result<Option<Evaluation>> {
        Ok(None)
    }
}

/// Outcome of the one robots.txt fetch a site run makes
#[derive(Debug, Clone)]
pub enum RobotsFetch {
    Found { url: String, robots: RobotsTxt },
    Missing { url: String, reason: String },
}

impl RobotsFetch {
    pub fn robots(&self) -> Option<&RobotsTxt> {
        match self {
            RobotsFetch::Found { robots, .. } => Some(robots),
            RobotsFetch::Missing { .. } => None,
        }
    }
}

/// Input to site executors
///
/// robots.txt is fetched lazily, at most once per site run, and shared by
/// every executor that needs it.
pub struct SiteInput<'a> {
    ctx: &'a SiteContext,
    fetcher: Arc<dyn Fetcher>,
    robots: OnceCell<RobotsFetch>,
}

impl<'a> SiteInput<'a> {
    pub fn new(ctx: &'a SiteContext, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            ctx,
            fetcher,
            robots: OnceCell::new(),
        }
    }

    pub fn context(&self) -> &'a SiteContext {
        self.ctx
    }

    pub fn fetcher(&self) -> &Arc<dyn Fetcher> {
        &self.fetcher
    }

    /// Scheme + host the network probes target, e.g. `https://acme.com`
    pub fn origin(&self) -> String {
        let from_homepage = Url::parse(&self.ctx.site.homepage_url)
            .ok()
            .filter(|u| u.host_str().is_some())
            .map(|u| u.origin().ascii_serialization());
        from_homepage.unwrap_or_else(|| format!("https://{}", self.ctx.site.domain.trim_end_matches('/')))
    }

    /// Absolute URL for a path on the site origin
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.origin(), path.trim_start_matches('/'))
    }

    /// robots.txt, fetched on first use
    pub fn robots(&self) -> &RobotsFetch {
        self.robots.get_or_init(|| {
            let url = self.url_for("robots.txt");
            match self.fetcher.get(&url) {
                Ok(resp) if is_plain_robots(&resp) => {
                    debug!("Fetched {} ({} bytes)", url, resp.body.len());
                    RobotsFetch::Found {
                        robots: RobotsTxt::parse(&resp.body),
                        url,
                    }
                }
                Ok(resp) => RobotsFetch::Missing {
                    reason: format!("HTTP {} ({})", resp.status, resp.content_type.as_deref().unwrap_or("no content type")),
                    url,
                },
                Err(e) => RobotsFetch::Missing {
                    reason: e.to_string(),
                    url,
                },
            }
        })
    }
}

/// A 2xx response that is not an HTML page served in robots.txt's place
fn is_plain_robots(resp: &FetchResponse) -> bool {
    resp.is_success() && !resp.looks_like_html()
}
