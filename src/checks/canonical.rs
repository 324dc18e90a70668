//! Canonical link check (C3)
//!
//! | canonical                         | score |
//! |-----------------------------------|-------|
//! | absent                            | 0     |
//! | unparseable                       | 25    |
//! | absolute, other registrable domain| 40    |
//! | relative (resolves against page)  | 70    |
//! | absolute, same registrable domain | 100   |

use super::base::CheckExecutor;
use super::ids;
use crate::content::domain::host_of;
use crate::content::{same_site, PageDocument};
use crate::models::Evaluation;
use anyhow::Result;
use scraper::Selector;
use std::sync::LazyLock;
use url::Url;

static CANONICAL_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"link[rel~="canonical"]"#).expect("BUG: hardcoded CSS selector 'link canonical' is invalid")
});

pub struct CanonicalCheck;

impl CanonicalCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CanonicalCheck {
    fn default() -> Self {
        Self::new()
    }
}

/// Compare URLs ignoring fragment and a trailing slash
fn same_location(a: &Url, b: &Url) -> bool {
    let key = |u: &Url| {
        let mut u = u.clone();
        u.set_fragment(None);
        let s = u.to_string();
        s.trim_end_matches('/').to_lowercase()
    };
    key(a) == key(b)
}

impl CheckExecutor for CanonicalCheck {
    fn id(&self) -> &'static str {
        ids::CANONICAL
    }

    fn description(&self) -> &'static str {
        "Canonical link present, absolute and on the page's own domain"
    }

    fn evaluate_page(&self, doc: &PageDocument) -> Result<Option<Evaluation>> {
        if !doc.has_html() {
            return Ok(None);
        }

        let Some(href) = doc.first_attr(&CANONICAL_SELECTOR, "href") else {
            return Ok(Some(
                Evaluation::scored(0.0)
                    .with_detail("canonical_url", serde_json::Value::Null)
                    .with_evidence("No canonical link"),
            ));
        };

        let page_url = Url::parse(doc.url()).ok();
        let page_host = host_of(doc.url()).unwrap_or_else(|| doc.site().domain.clone());

        let eval = match Url::parse(&href) {
            Ok(abs) if matches!(abs.scheme(), "http" | "https") => {
                let host = abs.host_str().unwrap_or_default();
                if same_site(host, &page_host) {
                    let self_ref = page_url.as_ref().is_some_and(|p| same_location(p, &abs));
                    Evaluation::scored(100.0).with_detail("self_referencing", self_ref)
                } else {
                    Evaluation::scored(40.0)
                        .with_detail("self_referencing", false)
                        .with_evidence(format!("Canonical points to another domain: {}", host))
                }
            }
            Ok(_) => Evaluation::scored(25.0).with_evidence("Canonical uses a non-HTTP scheme"),
            Err(url::ParseError::RelativeUrlWithoutBase) => match page_url.as_ref().map(|p| p.join(&href)) {
                Some(Ok(resolved)) => {
                    let self_ref = page_url.as_ref().is_some_and(|p| same_location(p, &resolved));
                    Evaluation::scored(70.0)
                        .with_detail("self_referencing", self_ref)
                        .with_evidence("Canonical is relative")
                }
                _ => Evaluation::scored(25.0).with_evidence("Canonical cannot be resolved"),
            },
            Err(e) => Evaluation::scored(25.0).with_evidence(format!("Canonical is not a valid URL: {}", e)),
        };
        Ok(Some(eval.with_detail("canonical_url", href)))
    }
}
