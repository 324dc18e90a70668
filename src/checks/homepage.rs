//! Homepage entity check (S7)
//!
//! Looks for Organization structured data in the homepage HTML carried by
//! the site context.

use super::base::{CheckExecutor, SiteInput};
use super::ids;
use crate::content::structured_data::string_field;
use crate::content::StructuredData;
use crate::models::{Evaluation, PageSummary};
use anyhow::Result;
use scraper::Html;
use url::Url;

pub struct HomepageEntityCheck;

impl HomepageEntityCheck {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HomepageEntityCheck {
    fn default() -> Self {
        Self::new()
    }
}

fn normalized(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.trim_start_matches("www.").to_ascii_lowercase();
    Some(format!("{}{}", host, parsed.path().trim_end_matches('/')))
}

/// The homepage summary: an exact match on the homepage URL, else the root path
fn homepage<'a>(pages: &'a [PageSummary], homepage_url: &str) -> Option<&'a PageSummary> {
    let wanted = normalized(homepage_url);
    pages
        .iter()
        .find(|p| wanted.is_some() && normalized(&p.url) == wanted)
        .or_else(|| {
            pages
                .iter()
                .find(|p| Url::parse(&p.url).is_ok_and(|u| u.path() == "/"))
        })
}

impl CheckExecutor for HomepageEntityCheck {
    fn id(&self) -> &'static str {
        ids::HOMEPAGE_ENTITY
    }

    fn description(&self) -> &'static str {
        "Homepage declares the Organization in structured data"
    }

    fn evaluate_site(&self, site: &SiteInput<'_>) -> Result<Option<Evaluation>> {
        let ctx = site.context();
        let Some(page) = homepage(&ctx.pages, &ctx.site.homepage_url) else {
            return Ok(None);
        };
        let Some(html) = page.html.as_deref().filter(|h| !h.trim().is_empty()) else {
            return Ok(None);
        };

        let data = StructuredData::extract(&Html::parse_document(html));
        let eval = match data.organization() {
            Some(org) => match string_field(org, "name") {
                Some(name) => Evaluation::scored(100.0).with_detail("name", name),
                None => Evaluation::scored(50.0).with_evidence("Homepage Organization has no name"),
            },
            None => Evaluation::scored(0.0).with_evidence("Homepage has no Organization structured data"),
        };
        Ok(Some(eval.with_detail("homepage", page.url.as_str())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::network::StaticFetcher;
    use crate::models::{SiteContext, SiteDescriptor};
    use std::sync::Arc;

    fn ctx(pages: Vec<PageSummary>) -> SiteContext {
        SiteContext {
            audit_id: "a1".into(),
            site: SiteDescriptor {
                domain: "acme.com".into(),
                homepage_url: "https://acme.com/".into(),
                target_locale: None,
            },
            pages,
        }
    }

    fn summary(url: &str, html: Option<&str>) -> PageSummary {
        PageSummary {
            page_id: url.into(),
            url: url.into(),
            results: Vec::new(),
            html: html.map(str::to_string),
        }
    }

    fn run(ctx: &SiteContext) -> Option<Evaluation> {
        HomepageEntityCheck::new()
            .evaluate_site(&SiteInput::new(ctx, Arc::new(StaticFetcher::offline())))
            .unwrap()
    }

    #[test]
    fn test_homepage_organization() {
        let c = ctx(vec![
            summary("https://acme.com/about", Some("<html></html>")),
            summary(
                "https://www.acme.com",
                Some(r#"<html><head><script type="application/ld+json">{"@type":"Organization","name":"Acme"}</script></head></html>"#),
            ),
        ]);
        let eval = run(&c).unwrap();
        assert_eq!(eval.score, 100.0);
        assert_eq!(eval.details["homepage"], "https://www.acme.com");
    }

    #[test]
    fn test_homepage_without_organization() {
        let c = ctx(vec![summary("https://acme.com/", Some("<html><body>hi</body></html>"))]);
        assert_eq!(run(&c).unwrap().score, 0.0);
    }

    #[test]
    fn test_no_homepage_html_is_absent() {
        assert!(run(&ctx(vec![summary("https://acme.com/", None)])).is_none());
        assert!(run(&ctx(vec![summary("https://acme.com/about", Some("<html></html>"))])).is_none());
    }
}
