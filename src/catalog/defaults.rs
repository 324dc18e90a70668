//! Built-in criteria table
//!
//! `sitegrade init` writes this table to disk so it can be edited; the
//! engine itself only ever reads the catalog through a `CatalogSource`.

use crate::checks::ids;
use crate::models::{CheckType, Criterion, Impact, Scope};

/// Every criterion with a built-in executor
pub fn default_criteria() -> Vec<Criterion> {
    vec![
        // Page criteria
        Criterion::new(ids::TITLE_QUALITY, Scope::Page)
            .with_label("Title quality")
            .with_weight(3.0)
            .with_order(10)
            .with_impact(Impact::High),
        Criterion::new(ids::META_DESCRIPTION, Scope::Page)
            .with_label("Meta description")
            .with_weight(2.0)
            .with_order(20),
        Criterion::new(ids::CANONICAL, Scope::Page)
            .with_label("Canonical URL")
            .with_weight(2.0)
            .with_order(30)
            .with_impact(Impact::High),
        Criterion::new(ids::HEADING_STRUCTURE, Scope::Page)
            .with_label("Heading structure")
            .with_weight(1.5)
            .with_order(40),
        Criterion::new(ids::FAQ_SCHEMA, Scope::Page)
            .with_label("FAQ structured data")
            .with_thresholds(75.0, 50.0)
            .with_order(50)
            .with_impact(Impact::Low),
        Criterion::new(ids::ENTITY_GRAPH, Scope::Page)
            .with_label("Organization entity graph")
            .with_weight(2.0)
            .with_thresholds(80.0, 55.0)
            .with_order(60),
        Criterion::new(ids::INTERNAL_LINKS, Scope::Page)
            .with_label("Internal linking")
            .with_weight(1.5)
            .with_thresholds(80.0, 50.0)
            .with_order(70),
        Criterion::new(ids::IMAGE_ALT, Scope::Page)
            .with_label("Image alt text")
            .with_thresholds(90.0, 70.0)
            .with_order(80)
            .with_impact(Impact::Low),
        Criterion::new(ids::CONTENT_DEPTH, Scope::Page)
            .with_label("Content depth")
            .with_weight(2.0)
            .with_thresholds(80.0, 50.0)
            .with_order(90),
        Criterion::new(ids::LANGUAGE, Scope::Page)
            .with_label("Document language")
            .with_order(100)
            .with_impact(Impact::Low),
        Criterion::new(ids::OPEN_GRAPH, Scope::Page)
            .with_label("Open Graph tags")
            .with_order(110)
            .with_impact(Impact::Low)
            .as_preview(),
        // Site criteria
        Criterion::new(ids::SITEMAP, Scope::Site)
            .with_label("Sitemap discoverability")
            .with_check_type(CheckType::NetworkBased)
            .with_weight(2.0)
            .with_thresholds(75.0, 50.0)
            .with_order(10)
            .with_impact(Impact::High),
        Criterion::new(ids::BOT_ACCESS, Scope::Site)
            .with_label("AI crawler access")
            .with_check_type(CheckType::NetworkBased)
            .with_weight(3.0)
            .with_thresholds(90.0, 60.0)
            .with_order(20)
            .with_impact(Impact::High),
        Criterion::new(ids::TITLE_PASS_RATE, Scope::Site)
            .with_label("Title pass rate")
            .with_check_type(CheckType::Aggregate)
            .with_weight(1.5)
            .with_order(30),
        Criterion::new(ids::DUPLICATE_TITLES, Scope::Site)
            .with_label("Duplicate titles")
            .with_check_type(CheckType::Aggregate)
            .with_thresholds(90.0, 70.0)
            .with_order(40),
        Criterion::new(ids::CONTENT_DEPTH_MEAN, Scope::Site)
            .with_label("Average content depth")
            .with_check_type(CheckType::Aggregate)
            .with_thresholds(80.0, 50.0)
            .with_order(50),
        Criterion::new(ids::DUPLICATE_DESCRIPTIONS, Scope::Site)
            .with_label("Duplicate meta descriptions")
            .with_check_type(CheckType::Aggregate)
            .with_thresholds(90.0, 70.0)
            .with_order(60)
            .with_impact(Impact::Low),
        Criterion::new(ids::HOMEPAGE_ENTITY, Scope::Site)
            .with_label("Homepage organization")
            .with_weight(2.0)
            .with_order(70),
    ]
}
