//! Sitemap discoverability check (S1)

use super::base::{CheckExecutor, SiteInput};
use super::ids;
use super::network::{first_success, FetchResponse};
use crate::models::Evaluation;
use anyhow::Result;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Conventional sitemap locations probed after any robots.txt `Sitemap:` lines
pub const FALLBACK_PATHS: &[&str] = &[
    "sitemap.xml",
    "sitemap_index.xml",
    "sitemap-index.xml",
    "wp-sitemap.xml",
];

/// Entry count at which the size component saturates
const FULL_ENTRY_COUNT: f64 = 50.0;

static URL_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<url[\s>]").expect("BUG: hardcoded sitemap url regex is invalid"));
static SITEMAP_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<sitemap[\s>]").expect("BUG: hardcoded sitemap index regex is invalid"));
static LASTMOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<lastmod[\s>]").expect("BUG: hardcoded lastmod regex is invalid"));

pub struct SitemapCheck;

impl SitemapCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SitemapCheck {
    fn default() -> Self {
        Self::new()
    }
}

/// Well-formed XML sitemap rather than an error page
pub fn is_sitemap(resp: &FetchResponse) -> bool {
    if !resp.is_success() || resp.looks_like_html() {
        return false;
    }
    let lower = resp.body.to_ascii_lowercase();
    lower.contains("<urlset") || lower.contains("<sitemapindex")
}

/// Counts pulled from a sitemap body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SitemapStats {
    pub urls: usize,
    pub child_sitemaps: usize,
    pub lastmod: usize,
}

impl SitemapStats {
    pub fn from_body(body: &str) -> Self {
        Self {
            urls: URL_ENTRY.find_iter(body).count(),
            child_sitemaps: SITEMAP_ENTRY.find_iter(body).count(),
            lastmod: LASTMOD.find_iter(body).count(),
        }
    }

    pub fn entries(&self) -> usize {
        self.urls + self.child_sitemaps
    }

    /// 50 base, +25 by lastmod coverage, +25 by size
    pub fn score(&self) -> f64 {
        let entries = self.entries() as f64;
        let freshness = if entries > 0.0 {
            (self.lastmod as f64 / entries).min(1.0)
        } else {
            0.0
        };
        50.0 + 25.0 * freshness + 25.0 * (entries / FULL_ENTRY_COUNT).min(1.0)
    }
}

fn candidates(site: &SiteInput<'_>) -> Vec<String> {
    let mut urls: Vec<String> = site
        .robots()
        .robots()
        .map(|r| r.sitemaps.clone())
        .unwrap_or_default();
    urls.extend(FALLBACK_PATHS.iter().map(|p| site.url_for(p)));
    let mut seen = std::collections::HashSet::new();
    urls.retain(|u| seen.insert(u.clone()));
    urls
}

impl CheckExecutor for SitemapCheck {
    fn id(&self) -> &'static str {
        ids::SITEMAP
    }

    fn description(&self) -> &'static str {
        "An XML sitemap is discoverable, sized and carries lastmod dates"
    }

    fn evaluate_site(&self, site: &SiteInput<'_>) -> Result<Option<Evaluation>> {
        let urls = candidates(site);
        debug!("Probing {} sitemap candidates", urls.len());

        let Some(found) = first_success(site.fetcher(), &urls, is_sitemap) else {
            return Ok(Some(
                Evaluation::scored(0.0)
                    .with_detail("found", false)
                    .with_detail("candidates", urls)
                    .with_evidence("No XML sitemap found"),
            ));
        };

        let stats = SitemapStats::from_body(&found.body);
        let kind = if stats.child_sitemaps > 0 && stats.urls == 0 {
            "sitemapindex"
        } else {
            "urlset"
        };
        let mut eval = Evaluation::scored(stats.score())
            .with_detail("found", true)
            .with_detail("url", found.url.as_str())
            .with_detail("kind", kind)
            .with_detail("entries", stats.entries())
            .with_detail("lastmod_entries", stats.lastmod);
        if stats.lastmod == 0 {
            eval = eval.with_evidence("Sitemap entries carry no <lastmod>");
        }
        Ok(Some(eval))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urlset(n: usize, with_lastmod: usize) -> String {
        let entries: String = (0..n)
            .map(|i| {
                let lastmod = if i < with_lastmod { "<lastmod>2024-01-01</lastmod>" } else { "" };
                format!("<url><loc>https://acme.com/{i}</loc>{lastmod}</url>")
            })
            .collect();
        format!(r#"<?xml version="1.0"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{entries}</urlset>"#)
    }

    #[test]
    fn test_stats_and_score() {
        let stats = SitemapStats::from_body(&urlset(10, 5));
        assert_eq!(stats.urls, 10);
        assert_eq!(stats.lastmod, 5);
        // 50 + 25 * 0.5 + 25 * 0.2
        assert!((stats.score() - 67.5).abs() < 1e-9);

        let full = SitemapStats::from_body(&urlset(60, 60));
        assert_eq!(full.score(), 100.0);
    }

    #[test]
    fn test_urlset_tag_not_counted_as_entry() {
        let stats = SitemapStats::from_body(&urlset(0, 0));
        assert_eq!(stats.entries(), 0);
        assert_eq!(stats.score(), 50.0);
    }

    #[test]
    fn test_sitemap_validation() {
        assert!(is_sitemap(&FetchResponse::ok("u", "application/xml", urlset(1, 0))));
        assert!(!is_sitemap(&FetchResponse::ok("u", "text/html", "<html><body>404</body></html>")));
        assert!(!is_sitemap(&FetchResponse::ok("u", "application/xml", urlset(1, 0)).with_status(404)));
        assert!(!is_sitemap(&FetchResponse::ok("u", "text/plain", "User-agent: *")));
    }
}
