//! Internal linking check (C7)
//!
//! Counts same-site http(s) anchors and rewards volume, distinct targets and
//! distinct anchor texts.

use super::base::CheckExecutor;
use super::ids;
use crate::content::domain::host_of;
use crate::content::text::collapse_whitespace;
use crate::content::{same_site, PageDocument};
use crate::models::Evaluation;
use anyhow::Result;
use scraper::{ElementRef, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("BUG: hardcoded CSS selector 'a[href]' is invalid"));

/// Link count at which the volume component saturates
const TARGET_LINKS: f64 = 10.0;

const GENERIC_ANCHOR_TEXTS: &[&str] = &["click here", "here", "read more", "learn more", "more", "link", "this"];

pub struct InternalLinksCheck;

impl InternalLinksCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InternalLinksCheck {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct InternalLink {
    target: String,
    text: String,
}

fn skipped_href(href: &str) -> bool {
    let lower = href.trim().to_ascii_lowercase();
    lower.is_empty()
        || lower.starts_with('#')
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("javascript:")
        || lower.starts_with("data:")
}

/// Target without fragment or trailing slash, for de-duplication
fn link_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    let s = url.to_string();
    s.strip_suffix('/').map(str::to_string).unwrap_or(s)
}

fn anchor_text(a: &ElementRef<'_>) -> String {
    let text = collapse_whitespace(&a.text().collect::<String>());
    if !text.is_empty() {
        return text.to_lowercase();
    }
    a.value()
        .attr("aria-label")
        .or_else(|| a.value().attr("title"))
        .map(|t| collapse_whitespace(t).to_lowercase())
        .unwrap_or_default()
}

fn internal_links(doc: &PageDocument) -> Vec<InternalLink> {
    let base = Url::parse(doc.url()).ok();
    let page_host = host_of(doc.url()).unwrap_or_else(|| doc.site().domain.clone());

    doc.html()
        .select(&ANCHOR_SELECTOR)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            if skipped_href(href) {
                return None;
            }
            let target = match &base {
                Some(b) => b.join(href.trim()).ok()?,
                None => Url::parse(href.trim()).ok()?,
            };
            if !matches!(target.scheme(), "http" | "https") || !same_site(target.host_str()?, &page_host) {
                return None;
            }
            Some(InternalLink {
                target: link_key(&target),
                text: anchor_text(&a),
            })
        })
        .collect()
}

impl CheckExecutor for InternalLinksCheck {
    fn id(&self) -> &'static str {
        ids::INTERNAL_LINKS
    }

    fn description(&self) -> &'static str {
        "Enough internal links with varied targets and descriptive anchor text"
    }

    fn evaluate_page(&self, doc: &PageDocument) -> Result<Option<Evaluation>> {
        if !doc.has_html() {
            return Ok(None);
        }

        let links = internal_links(doc);
        if links.is_empty() {
            return Ok(Some(
                Evaluation::scored(0.0)
                    .with_detail("internal_links", 0)
                    .with_evidence("No internal links"),
            ));
        }

        let count = links.len() as f64;
        let targets: HashSet<&str> = links.iter().map(|l| l.target.as_str()).collect();
        let texts: HashSet<&str> = links
            .iter()
            .map(|l| l.text.as_str())
            .filter(|t| !t.is_empty())
            .collect();
        let generic: Vec<String> = links
            .iter()
            .filter(|l| GENERIC_ANCHOR_TEXTS.contains(&l.text.as_str()))
            .map(|l| format!("Generic anchor text \"{}\" -> {}", l.text, l.target))
            .take(5)
            .collect();

        let score = 40.0 * (count / TARGET_LINKS).min(1.0)
            + 30.0 * targets.len() as f64 / count
            + 30.0 * texts.len() as f64 / count;

        Ok(Some(
            Evaluation::scored(score)
                .with_detail("internal_links", links.len())
                .with_detail("unique_targets", targets.len())
                .with_detail("unique_anchor_texts", texts.len())
                .with_evidence_list(generic),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::test_support::page;

    fn eval(body: &str) -> Evaluation {
        let html = format!("<html><body>{}</body></html>", body);
        InternalLinksCheck::new()
            .evaluate_page(&page("https://www.acme.com/blog/post", &html))
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_filters_non_internal_links() {
        let e = eval(
            r##"<a href="/a">A</a><a href="https://acme.com/b">B</a><a href="https://shop.acme.com/c">C</a>
               <a href="https://other.com/x">X</a><a href="mailto:hi@acme.com">Mail</a>
               <a href="#top">Top</a><a href="javascript:void(0)">JS</a><a href="ftp://acme.com/f">F</a>"##,
        );
        assert_eq!(e.details["internal_links"], 3);
    }

    #[test]
    fn test_rich_linking_scores_full() {
        let body: String = (0..12)
            .map(|i| format!(r#"<a href="/guide/{i}">Guide number {i}</a>"#))
            .collect();
        assert_eq!(eval(&body).score, 100.0);
    }

    #[test]
    fn test_repetitive_links_score_lower() {
        let body = r#"<a href="/x">more</a>"#.repeat(10);
        let e = eval(&body);
        // 40 volume + 3 target diversity + 3 text diversity
        assert!((e.score - 46.0).abs() < 1e-9);
        assert!(!e.evidence.is_empty());
    }

    #[test]
    fn test_no_links() {
        assert_eq!(eval("<p>No links</p>").score, 0.0);
    }
}
