//! Check executors
//!
//! Each executor fulfils one criterion id from the catalog and evaluates a
//! page, the whole site, or both.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    ExecutorRegistry                      │
//! │  - id -> executor, explicit ordered table                │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │                   CheckExecutor trait                    │
//! │  - evaluate_page(&PageDocument)                          │
//! │  - evaluate_site(&SiteInput)                             │
//! └──────────────────────────────────────────────────────────┘
//!                              │
//!              ┌───────────────┼───────────────┐
//!              ▼               ▼               ▼
//! ┌──────────────────┐ ┌──────────────┐ ┌──────────────────┐
//! │ DOM-based        │ │ Network      │ │ Aggregate        │
//! │ (title, canon-   │ │ (sitemap,    │ │ (pass rate,      │
//! │  ical, FAQ, ...) │ │  bot access) │ │  duplicates)     │
//! └──────────────────┘ └──────────────┘ └──────────────────┘
//! ```

mod base;
mod registry;

// Page executors
mod canonical;
mod content_depth;
mod entity_graph;
mod faq;
mod headings;
mod images;
mod internal_links;
mod language;
mod meta_description;
mod open_graph;
mod title;

// Site executors
pub mod aggregate;
mod homepage;
pub mod network;
pub mod robots;
mod sitemap;

pub use base::{CheckExecutor, RobotsFetch, SiteInput};
pub use registry::ExecutorRegistry;

pub use canonical::CanonicalCheck;
pub use content_depth::ContentDepthCheck;
pub use entity_graph::EntityGraphCheck;
pub use faq::FaqSchemaCheck;
pub use headings::HeadingStructureCheck;
pub use images::ImageAltCheck;
pub use internal_links::InternalLinksCheck;
pub use language::LanguageCheck;
pub use meta_description::MetaDescriptionCheck;
pub use open_graph::OpenGraphCheck;
pub use title::TitleQualityCheck;

pub use aggregate::{ContentDepthMeanCheck, DuplicateDetailCheck, TitlePassRateCheck};
pub use homepage::HomepageEntityCheck;
pub use network::{FetchError, FetchResponse, Fetcher, HttpFetcher, StaticFetcher};
pub use robots::{BotAccessCheck, RobotsTxt};
pub use sitemap::SitemapCheck;

use std::sync::Arc;

/// Stable criterion ids of the built-in executors
pub mod ids {
    pub const TITLE_QUALITY: &str = "C1_title_quality";
    pub const META_DESCRIPTION: &str = "C2_meta_description";
    pub const CANONICAL: &str = "C3_canonical";
    pub const HEADING_STRUCTURE: &str = "C4_heading_structure";
    pub const FAQ_SCHEMA: &str = "C5_faq_schema";
    pub const ENTITY_GRAPH: &str = "C6_entity_graph";
    pub const INTERNAL_LINKS: &str = "C7_internal_links";
    pub const IMAGE_ALT: &str = "C8_image_alt";
    pub const CONTENT_DEPTH: &str = "C9_content_depth";
    pub const LANGUAGE: &str = "C10_language";
    pub const OPEN_GRAPH: &str = "C11_open_graph";

    pub const SITEMAP: &str = "S1_sitemap";
    pub const BOT_ACCESS: &str = "S2_bot_access";
    pub const TITLE_PASS_RATE: &str = "S3_title_pass_rate";
    pub const DUPLICATE_TITLES: &str = "S4_duplicate_titles";
    pub const CONTENT_DEPTH_MEAN: &str = "S5_content_depth_mean";
    pub const DUPLICATE_DESCRIPTIONS: &str = "S6_duplicate_descriptions";
    pub const HOMEPAGE_ENTITY: &str = "S7_homepage_entity";
}

/// Every built-in executor, page executors first
pub fn default_executors() -> Vec<Arc<dyn CheckExecutor>> {
    vec![
        // Page executors
        Arc::new(TitleQualityCheck::new()),
        Arc::new(MetaDescriptionCheck::new()),
        Arc::new(CanonicalCheck::new()),
        Arc::new(HeadingStructureCheck::new()),
        Arc::new(FaqSchemaCheck::new()),
        Arc::new(EntityGraphCheck::new()),
        Arc::new(InternalLinksCheck::new()),
        Arc::new(ImageAltCheck::new()),
        Arc::new(ContentDepthCheck::new()),
        Arc::new(LanguageCheck::new()),
        Arc::new(OpenGraphCheck::new()),
        // Site executors
        Arc::new(SitemapCheck::new()),
        Arc::new(BotAccessCheck::new()),
        Arc::new(TitlePassRateCheck),
        Arc::new(DuplicateDetailCheck::titles()),
        Arc::new(ContentDepthMeanCheck),
        Arc::new(DuplicateDetailCheck::descriptions()),
        Arc::new(HomepageEntityCheck::new()),
    ]
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::content::{DocumentLimits, PageDocument};
    use crate::models::{CheckResult, Criterion, Evaluation, PageContext, PageSummary, Scope, SiteContext, SiteDescriptor};

    pub fn site() -> SiteDescriptor {
        SiteDescriptor {
            domain: "acme.com".into(),
            homepage_url: "https://acme.com/".into(),
            target_locale: None,
        }
    }

    pub fn page_with_locale(url: &str, html: &str, locale: Option<&str>) -> PageDocument {
        let ctx = PageContext {
            page_id: "p1".into(),
            url: url.into(),
            rendered_html: Some(html.into()),
            static_html: None,
            site: SiteDescriptor {
                target_locale: locale.map(str::to_string),
                ..site()
            },
        };
        PageDocument::from_context(&ctx, &DocumentLimits::default())
    }

    pub fn page(url: &str, html: &str) -> PageDocument {
        page_with_locale(url, html, None)
    }

    pub fn empty_page(url: &str) -> PageDocument {
        let ctx = PageContext {
            page_id: "p1".into(),
            url: url.into(),
            site: site(),
            ..Default::default()
        };
        PageDocument::from_context(&ctx, &DocumentLimits::default())
    }

    /// One page per `(check id, score, detail key, detail value)`
    pub fn site_with_results(rows: &[(&str, f64, &str, &str)]) -> SiteContext {
        let pages = rows
            .iter()
            .enumerate()
            .map(|(i, (id, score, key, value))| {
                let criterion = Criterion::new(*id, Scope::Page);
                PageSummary {
                    page_id: format!("p{}", i),
                    url: format!("https://acme.com/p{}", i),
                    results: vec![CheckResult::finalize(
                        &criterion,
                        Evaluation::scored(*score).with_detail(*key, *value),
                    )],
                    html: None,
                }
            })
            .collect();
        SiteContext {
            audit_id: "audit-1".into(),
            site: site(),
            pages,
        }
    }
}
