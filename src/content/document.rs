//! Parsed page document shared by all page executors
//!
//! The payload choice (rendered vs static) and the size cap are applied once
//! per page here, before any executor runs.

use super::structured_data::StructuredData;
use crate::models::{PageContext, SiteDescriptor};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use tracing::debug;

/// Hard ceiling on HTML fed to the DOM parser
pub const DEFAULT_MAX_HTML_BYTES: usize = 2 * 1024 * 1024;

/// Rendered payloads smaller than this are treated as failed renders
pub const DEFAULT_MIN_RENDERED_BYTES: usize = 1024;

/// Size limits applied when building a [`PageDocument`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentLimits {
    pub max_html_bytes: usize,
    pub min_rendered_bytes: usize,
}

impl Default for DocumentLimits {
    fn default() -> Self {
        Self {
            max_html_bytes: DEFAULT_MAX_HTML_BYTES,
            min_rendered_bytes: DEFAULT_MIN_RENDERED_BYTES,
        }
    }
}

/// Which payload a page was evaluated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadSource {
    Rendered,
    Static,
    None,
}

/// Pick the payload to evaluate.
///
/// Rendered wins unless it is implausibly small and a larger static payload
/// exists.
pub fn choose_payload<'a>(
    ctx: &'a PageContext,
    limits: &DocumentLimits,
) -> (PayloadSource, Option<&'a str>) {
    let rendered = ctx.rendered_html.as_deref().filter(|h| !h.trim().is_empty());
    let fallback = ctx.static_html.as_deref().filter(|h| !h.trim().is_empty());

    match (rendered, fallback) {
        (Some(r), Some(s)) if r.len() < limits.min_rendered_bytes && s.len() > r.len() => {
            debug!(
                "Page {}: rendered payload is {} bytes, falling back to static ({} bytes)",
                ctx.page_id,
                r.len(),
                s.len()
            );
            (PayloadSource::Static, Some(s))
        }
        (Some(r), _) => (PayloadSource::Rendered, Some(r)),
        (None, Some(s)) => (PayloadSource::Static, Some(s)),
        (None, None) => (PayloadSource::None, None),
    }
}

/// Cut `html` to at most `max_bytes`, on a char boundary
pub fn truncate_html(html: &str, max_bytes: usize) -> (&str, bool) {
    if html.len() <= max_bytes {
        return (html, false);
    }
    let mut end = max_bytes;
    while end > 0 && !html.is_char_boundary(end) {
        end -= 1;
    }
    (&html[..end], true)
}

/// One page, parsed once, as seen by page executors
pub struct PageDocument {
    page_id: String,
    url: String,
    site: SiteDescriptor,
    source: PayloadSource,
    truncated: bool,
    html: Html,
    structured: OnceCell<StructuredData>,
}

impl PageDocument {
    pub fn from_context(ctx: &PageContext, limits: &DocumentLimits) -> Self {
        let (source, payload) = choose_payload(ctx, limits);
        let (html, truncated) = match payload {
            Some(raw) => {
                let (capped, truncated) = truncate_html(raw, limits.max_html_bytes);
                if truncated {
                    debug!(
                        "Page {}: HTML truncated from {} to {} bytes",
                        ctx.page_id,
                        raw.len(),
                        capped.len()
                    );
                }
                (Html::parse_document(capped), truncated)
            }
            None => (Html::new_document(), false),
        };

        Self {
            page_id: ctx.page_id.clone(),
            url: ctx.url.clone(),
            site: ctx.site.clone(),
            source,
            truncated,
            html,
            structured: OnceCell::new(),
        }
    }

    pub fn page_id(&self) -> &str {
        &self.page_id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn site(&self) -> &SiteDescriptor {
        &self.site
    }

    pub fn source(&self) -> PayloadSource {
        self.source
    }

    pub fn was_truncated(&self) -> bool {
        self.truncated
    }

    /// Whether any HTML payload was available
    pub fn has_html(&self) -> bool {
        self.source != PayloadSource::None
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// JSON-LD nodes, extracted on first use
    pub fn structured_data(&self) -> &StructuredData {
        self.structured
            .get_or_init(|| StructuredData::extract(&self.html))
    }

    /// Trimmed text of the first element matching `selector`
    pub fn first_text(&self, selector: &Selector) -> Option<String> {
        self.html
            .select(selector)
            .next()
            .map(|el| super::text::collapse_whitespace(&el.text().collect::<String>()))
    }

    /// Trimmed value of `attr` on the first element matching `selector`
    pub fn first_attr(&self, selector: &Selector, attr: &str) -> Option<String> {
        self.html
            .select(selector)
            .filter_map(|el| el.value().attr(attr))
            .map(str::trim)
            .find(|v| !v.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(rendered: Option<&str>, fallback: Option<&str>) -> PageContext {
        PageContext {
            page_id: "p".into(),
            url: "https://acme.com/".into(),
            rendered_html: rendered.map(str::to_string),
            static_html: fallback.map(str::to_string),
            site: SiteDescriptor::default(),
        }
    }

    #[test]
    fn test_prefers_rendered() {
        let big = format!("<html><body>{}</body></html>", "x".repeat(2000));
        let c = ctx(Some(&big), Some("<html></html>"));
        assert_eq!(choose_payload(&c, &DocumentLimits::default()).0, PayloadSource::Rendered);
    }

    #[test]
    fn test_falls_back_when_render_is_tiny() {
        let big = format!("<html><body>{}</body></html>", "x".repeat(2000));
        let c = ctx(Some("<html></html>"), Some(&big));
        assert_eq!(choose_payload(&c, &DocumentLimits::default()).0, PayloadSource::Static);

        // Tiny render but no larger static payload: keep the render
        let c = ctx(Some("<html><body>hi</body></html>"), None);
        assert_eq!(choose_payload(&c, &DocumentLimits::default()).0, PayloadSource::Rendered);
    }

    #[test]
    fn test_no_payload() {
        let c = ctx(None, Some("   "));
        let doc = PageDocument::from_context(&c, &DocumentLimits::default());
        assert!(!doc.has_html());
        assert_eq!(doc.source(), PayloadSource::None);
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let (cut, truncated) = truncate_html("aé", 2);
        assert!(truncated);
        assert_eq!(cut, "a");
        let (cut, truncated) = truncate_html("abc", 10);
        assert!(!truncated);
        assert_eq!(cut, "abc");
    }

    #[test]
    fn test_document_is_capped() {
        let html = format!("<html><body><p>{}</p></body></html>", "word ".repeat(100));
        let c = ctx(Some(&html), None);
        let limits = DocumentLimits {
            max_html_bytes: 64,
            min_rendered_bytes: 0,
        };
        let doc = PageDocument::from_context(&c, &limits);
        assert!(doc.was_truncated());
        assert!(doc.has_html());
    }
}
