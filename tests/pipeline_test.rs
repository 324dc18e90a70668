//! End-to-end pipeline tests: page runs, the site barrier, network failure
//! handling and catalog-driven composite scoring.

use sitegrade::catalog::{default_criteria, write_catalog, FileCatalog, StaticCatalog};
use sitegrade::checks::{ids, ExecutorRegistry, FetchResponse, StaticFetcher};
use sitegrade::engine::{AuditInput, AuditRunner, PageOrchestrator, PageRef, SiteOrchestrator};
use sitegrade::models::{CheckStatus, PageContext, Scope, SiteDescriptor};
use sitegrade::store::{MemoryStore, ResultStore};
use sitegrade::EngineError;
use std::sync::Arc;

fn acme() -> SiteDescriptor {
    SiteDescriptor {
        domain: "acme.com".into(),
        homepage_url: "https://acme.com/".into(),
        target_locale: Some("en-US".into()),
    }
}

fn page(id: &str, url: &str, html: &str) -> PageContext {
    PageContext {
        page_id: id.into(),
        url: url.into(),
        rendered_html: Some(html.into()),
        static_html: None,
        site: acme(),
    }
}

const HOME: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <title>Acme Widgets — Official Site</title>
  <meta name="description" content="Acme builds industrial widgets and gadgets for factories, workshops and home tinkerers since 1952.">
  <link rel="canonical" href="https://acme.com/">
  <meta property="og:title" content="Acme Widgets">
  <script type="application/ld+json">
    {"@context": "https://schema.org", "@type": "Organization", "name": "Acme",
     "logo": "https://acme.com/logo.png", "sameAs": ["https://twitter.com/acme"]}
  </script>
</head>
<body>
  <main>
    <h1>Widgets for every workshop</h1>
    <h2>Catalog</h2>
    <p>Browse our range of widgets.</p>
    <a href="/widgets">Widget catalog</a>
    <a href="/about">About Acme</a>
    <img src="/hero.png" alt="Acme factory floor">
  </main>
</body>
</html>"#;

fn orchestrator(store: Arc<MemoryStore>) -> PageOrchestrator {
    PageOrchestrator::new(
        Arc::new(StaticCatalog::builtin()),
        Arc::new(ExecutorRegistry::builtin()),
        store,
    )
}

#[test]
fn brand_in_title_beats_length_only_baseline() {
    let store = Arc::new(MemoryStore::new());
    let results = orchestrator(store)
        .evaluate(&page("home", "https://acme.com/", HOME))
        .expect("page run");
    let title = results
        .iter()
        .find(|r| r.id == ids::TITLE_QUALITY)
        .expect("title result");
    assert_eq!(title.detail_str("brand"), Some("acme"));
    assert_eq!(title.detail_str("brand_source"), Some("structured_data"));
    assert_eq!(title.details["brand_in_title"], true);

    // Same length class, no brand anywhere but the domain label
    let unbranded = page(
        "plain",
        "https://acme.com/plain",
        "<html><head><title>Industrial Widgets Official Site</title></head><body></body></html>",
    );
    let store = Arc::new(MemoryStore::new());
    let baseline = orchestrator(store)
        .evaluate(&unbranded)
        .expect("page run")
        .into_iter()
        .find(|r| r.id == ids::TITLE_QUALITY)
        .expect("title result");
    assert_eq!(baseline.details["brand_in_title"], false);
    assert!(title.score > baseline.score);
    assert_eq!(title.status, CheckStatus::Ok);
}

#[test]
fn page_pipeline_is_byte_identical_across_runs() {
    let store = Arc::new(MemoryStore::new());
    let ctx = page("home", "https://acme.com/", HOME);
    let first = orchestrator(store.clone()).evaluate(&ctx).expect("first");
    let second = orchestrator(store.clone()).evaluate(&ctx).expect("second");
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(store.load_for_page("home").unwrap(), Some(second));
}

#[test]
fn site_run_waits_for_every_page() {
    let store = Arc::new(MemoryStore::new());
    orchestrator(store.clone())
        .evaluate(&page("home", "https://acme.com/", HOME))
        .expect("page run");

    let site = SiteOrchestrator::new(
        Arc::new(StaticCatalog::builtin()),
        Arc::new(ExecutorRegistry::builtin()),
        store.clone(),
        Arc::new(StaticFetcher::offline()),
    );
    let refs = vec![
        PageRef {
            page_id: "home".into(),
            url: "https://acme.com/".into(),
            html: Some(HOME.into()),
        },
        PageRef {
            page_id: "about".into(),
            url: "https://acme.com/about".into(),
            html: None,
        },
    ];
    match site.evaluate("audit-1", &acme(), &refs) {
        Err(EngineError::PagesIncomplete { audit_id, missing }) => {
            assert_eq!(audit_id, "audit-1");
            assert_eq!(missing, vec!["about".to_string()]);
        }
        other => panic!("expected PagesIncomplete, got {:?}", other.map(|r| r.len())),
    }
    assert!(store.load_for_audit("audit-1").unwrap().is_none());

    // Once the missing page is stored the same call succeeds
    store.save_for_page("about", &[]).unwrap();
    let results = site.evaluate("audit-1", &acme(), &refs).expect("site run");
    let homepage = results
        .iter()
        .find(|r| r.id == ids::HOMEPAGE_ENTITY)
        .expect("homepage entity");
    assert_eq!(homepage.score, 100.0);
}

fn audit_input() -> AuditInput {
    AuditInput {
        audit_id: "acme-1".into(),
        site: acme(),
        pages: vec![
            page("home", "https://acme.com/", HOME),
            page(
                "about",
                "https://acme.com/about",
                "<html lang=\"en\"><head><title>About Acme and our widget history</title></head>\
                 <body><h1>About</h1><p>Founded long ago.</p></body></html>",
            ),
        ],
    }
}

#[test]
fn unreachable_robots_does_not_abort_the_site_run() {
    let store = Arc::new(MemoryStore::new());
    let report = AuditRunner::new(
        Arc::new(StaticCatalog::builtin()),
        Arc::new(ExecutorRegistry::builtin()),
        store,
        Arc::new(StaticFetcher::offline()),
    )
    .with_workers(2)
    .run(&audit_input())
    .expect("audit completes");

    let site = |id: &str| {
        report
            .site_results
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .expect("site result")
    };
    let bots = site(ids::BOT_ACCESS);
    assert_eq!(bots.score, 70.0);
    assert_eq!(bots.detail_str("robots"), Some("missing"));
    let sitemap = site(ids::SITEMAP);
    assert_eq!(sitemap.score, 0.0);
    assert_eq!(sitemap.status, CheckStatus::Fail);
    assert!(report.composite.total > 0.0);
}

#[test]
fn served_robots_and_sitemap_are_scored() {
    let fetcher = StaticFetcher::offline()
        .with(FetchResponse::ok(
            "https://acme.com/robots.txt",
            "text/plain",
            "User-agent: *\nAllow: /\n\nUser-agent: GPTBot\nDisallow: /\n\nSitemap: https://acme.com/pages.xml\n",
        ))
        .with(FetchResponse::ok(
            "https://acme.com/pages.xml",
            "application/xml",
            "<?xml version=\"1.0\"?><urlset>\
             <url><loc>https://acme.com/</loc><lastmod>2026-01-01</lastmod></url>\
             <url><loc>https://acme.com/about</loc></url></urlset>",
        ));
    let store = Arc::new(MemoryStore::new());
    let report = AuditRunner::new(
        Arc::new(StaticCatalog::builtin()),
        Arc::new(ExecutorRegistry::builtin()),
        store,
        Arc::new(fetcher),
    )
    .run(&audit_input())
    .expect("audit completes");

    let bots = report
        .site_results
        .iter()
        .find(|r| r.id == ids::BOT_ACCESS)
        .expect("bot access");
    assert_eq!(bots.detail_str("robots"), Some("found"));
    assert_eq!(bots.details["bots"]["GPTBot"], "blocked");
    assert!(bots.score < 100.0 && bots.score > 0.0);

    let sitemap = report
        .site_results
        .iter()
        .find(|r| r.id == ids::SITEMAP)
        .expect("sitemap");
    assert_eq!(sitemap.detail_str("url"), Some("https://acme.com/pages.xml"));
    assert_eq!(sitemap.details["entries"], 2);
    assert!(sitemap.score >= 50.0);
}

#[test]
fn catalog_edits_drive_execution_and_composite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("criteria.toml");
    let mut criteria = default_criteria();
    for criterion in criteria.iter_mut() {
        if criterion.id == ids::CANONICAL {
            criterion.enabled = false;
        }
        if criterion.id == ids::HEADING_STRUCTURE {
            criterion.preview = true;
        }
    }
    write_catalog(&path, &criteria).unwrap();

    let catalog = Arc::new(FileCatalog::new(&path));
    let runner = AuditRunner::new(
        catalog.clone(),
        Arc::new(ExecutorRegistry::builtin()),
        Arc::new(MemoryStore::new()),
        Arc::new(StaticFetcher::offline()),
    );
    let report = runner.run(&audit_input()).expect("audit");
    let all = report.all_results();

    assert!(all.iter().all(|r| r.id != ids::CANONICAL));
    let headings: Vec<_> = all.iter().filter(|r| r.id == ids::HEADING_STRUCTURE).collect();
    assert_eq!(headings.len(), 2);
    assert!(headings.iter().all(|r| r.preview));
    assert_eq!(report.composite.counts.disabled, 1);
    // Heading structure plus the catalog's built-in preview criteria
    let builtin_previews = criteria.iter().filter(|c| c.enabled && c.preview).count();
    assert_eq!(report.composite.counts.preview, builtin_previews);

    // Weighted mean over enabled, non-preview results only
    let weight_of = |id: &str| criteria.iter().find(|c| c.id == id).map(|c| c.weight).unwrap();
    let scored: Vec<_> = all.iter().filter(|r| !r.preview).collect();
    let total_weight: f64 = scored.iter().map(|r| weight_of(&r.id)).sum();
    let weighted: f64 = scored.iter().map(|r| r.score * weight_of(&r.id)).sum();
    assert!((report.composite.total - weighted / total_weight).abs() <= 0.05);
    assert_eq!(report.composite.counts.included, scored.len());

    let page_only: Vec<_> = scored.iter().filter(|r| r.scope == Scope::Page).collect();
    let page_weight: f64 = page_only.iter().map(|r| weight_of(&r.id)).sum();
    let page_sum: f64 = page_only.iter().map(|r| r.score * weight_of(&r.id)).sum();
    assert!((report.composite.page_score - page_sum / page_weight).abs() <= 0.05);

    // Disabling the title criterion takes effect on the next run
    for criterion in criteria.iter_mut() {
        if criterion.id == ids::TITLE_QUALITY {
            criterion.enabled = false;
        }
    }
    write_catalog(&path, &criteria).unwrap();
    let report = runner.run(&audit_input()).expect("audit");
    assert!(report.all_results().iter().all(|r| r.id != ids::TITLE_QUALITY));
    assert_eq!(report.composite.counts.disabled, 2);
}
