//! Brand-name normalization and candidate resolution
//!
//! A page's brand is inferred from the most reliable signal available:
//!
//! 1. JSON-LD Organization / WebSite / LocalBusiness `name`
//! 2. `og:site_name`
//! 3. `twitter:site` handle
//! 4. `alt` text of an image whose alt mentions "logo"
//! 5. visible text of a link to the homepage
//! 6. the registrable-domain label of the page host
//!
//! The first candidate whose normalized form has at least
//! [`MIN_BRAND_LEN`] characters wins.

use super::cascade::{Cascade, Resolved};
use super::document::PageDocument;
use super::domain::{domain_label, host_of, registrable_domain};
use super::text::collapse_whitespace;
use scraper::Selector;
use std::sync::LazyLock;
use url::Url;

pub const MIN_BRAND_LEN: usize = 3;

const LEGAL_SUFFIXES: &[&str] = &[
    "inc", "llc", "ltd", "gmbh", "corp", "co", "plc", "limited", "corporation", "incorporated",
    "sa", "ag", "bv", "pty", "srl", "oy", "ab",
];

static OG_SITE_NAME_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[property="og:site_name"]"#)
        .expect("BUG: hardcoded CSS selector 'og:site_name' is invalid")
});

static TWITTER_SITE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[name="twitter:site"], meta[property="twitter:site"]"#)
        .expect("BUG: hardcoded CSS selector 'twitter:site' is invalid")
});

static IMG_ALT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("img[alt]").expect("BUG: hardcoded CSS selector 'img[alt]' is invalid")
});

static ANCHOR_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("a[href]").expect("BUG: hardcoded CSS selector 'a[href]' is invalid")
});

/// Normalize a brand string for comparison.
///
/// Lower-cases, strips trademark glyphs, maps `&` to `and`, replaces
/// punctuation with spaces, collapses whitespace and drops trailing legal
/// suffixes (`Inc.`, `LLC`, `GmbH`, ...).
pub fn normalize_brand(raw: &str) -> String {
    let lowered = raw.to_lowercase().replace('&', " and ");
    let cleaned: String = lowered
        .chars()
        .filter(|c| !matches!(c, '™' | '®' | '©' | '℠'))
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect();

    let mut words: Vec<&str> = cleaned.split_whitespace().collect();
    while words.len() > 1 {
        match words.last() {
            Some(last) if LEGAL_SUFFIXES.contains(last) => {
                words.pop();
            }
            _ => break,
        }
    }
    words.join(" ")
}

/// Normalized candidate, kept only when long enough to be meaningful
fn candidate(raw: Option<String>) -> Option<String> {
    raw.map(|r| normalize_brand(&r)).filter(|n| !n.is_empty())
}

fn meta_content(doc: &PageDocument, selector: &Selector) -> Option<String> {
    doc.html()
        .select(selector)
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn logo_alt(doc: &PageDocument) -> Option<String> {
    doc.html()
        .select(&IMG_ALT_SELECTOR)
        .filter_map(|el| el.value().attr("alt"))
        .find(|alt| alt.to_lowercase().contains("logo"))
        .map(|alt| {
            // "Acme logo" -> "Acme"
            let lowered = alt.to_lowercase();
            let stripped = lowered.replace("logo", " ");
            collapse_whitespace(&stripped)
        })
}

fn is_home_link(href: &str, page_url: Option<&Url>) -> bool {
    let href = href.trim();
    if href == "/" || href == "./" || href == "index.html" || href == "/index.html" {
        return true;
    }
    let Some(base) = page_url else {
        return false;
    };
    let Ok(target) = base.join(href) else {
        return false;
    };
    let same_host = match (target.host_str(), base.host_str()) {
        (Some(t), Some(b)) => registrable_domain(t) == registrable_domain(b),
        _ => false,
    };
    same_host && matches!(target.path(), "" | "/" | "/index.html")
}

fn home_link_text(doc: &PageDocument) -> Option<String> {
    let page_url = Url::parse(doc.url()).ok();
    doc.html()
        .select(&ANCHOR_SELECTOR)
        .filter(|a| {
            a.value()
                .attr("href")
                .is_some_and(|href| is_home_link(href, page_url.as_ref()))
        })
        .map(|a| collapse_whitespace(&a.text().collect::<String>()))
        .find(|text| !text.is_empty() && !text.eq_ignore_ascii_case("home"))
}

/// Resolve the page's brand candidate through the priority cascade
pub fn resolve_brand(doc: &PageDocument) -> Option<Resolved<String>> {
    Cascade::new()
        .then("structured_data", || candidate(doc.structured_data().brand_name()))
        .then("og_site_name", || candidate(meta_content(doc, &OG_SITE_NAME_SELECTOR)))
        .then("twitter_site", || {
            candidate(meta_content(doc, &TWITTER_SITE_SELECTOR).map(|h| h.trim_start_matches('@').to_string()))
        })
        .then("logo_alt", || candidate(logo_alt(doc)))
        .then("home_link", || candidate(home_link_text(doc)))
        .then("domain", || {
            let host = host_of(doc.url()).unwrap_or_else(|| doc.site().domain.clone());
            candidate(domain_label(&host))
        })
        .resolve(|c| c.chars().count() >= MIN_BRAND_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::document::{DocumentLimits, PageDocument};
    use crate::models::{PageContext, SiteDescriptor};

    fn doc(url: &str, html: &str) -> PageDocument {
        let ctx = PageContext {
            page_id: "p1".into(),
            url: url.into(),
            rendered_html: Some(html.into()),
            static_html: None,
            site: SiteDescriptor {
                domain: "acme.com".into(),
                homepage_url: "https://acme.com/".into(),
                target_locale: None,
            },
        };
        PageDocument::from_context(&ctx, &DocumentLimits::default())
    }

    #[test]
    fn test_normalize_brand() {
        assert_eq!(normalize_brand("Acme, Inc."), "acme");
        assert_eq!(normalize_brand("Smith & Sons Ltd"), "smith and sons");
        assert_eq!(normalize_brand("Globex™ GmbH"), "globex");
        assert_eq!(normalize_brand("  Initech LLC  "), "initech");
        assert_eq!(normalize_brand("Co"), "co");
    }

    #[test]
    fn test_structured_data_wins() {
        let d = doc(
            "https://www.acme.com/widgets",
            r#"<html><head>
                <script type="application/ld+json">{"@type": "Organization", "name": "Acme"}</script>
                <meta property="og:site_name" content="Acme Store">
            </head><body></body></html>"#,
        );
        let brand = resolve_brand(&d).expect("brand");
        assert_eq!(brand.value, "acme");
        assert_eq!(brand.source, "structured_data");
    }

    #[test]
    fn test_short_candidates_are_skipped() {
        let d = doc(
            "https://www.initech.com/",
            r#"<html><head><meta property="og:site_name" content="IT">
               <meta name="twitter:site" content="@initech"></head><body></body></html>"#,
        );
        let brand = resolve_brand(&d).expect("brand");
        assert_eq!(brand.value, "initech");
        assert_eq!(brand.source, "twitter_site");
    }

    #[test]
    fn test_logo_alt_and_home_link() {
        let d = doc(
            "https://globex.com/about",
            r#"<html><body><a href="/"><img src="l.png" alt="Globex Corp logo"></a></body></html>"#,
        );
        let brand = resolve_brand(&d).expect("brand");
        assert_eq!(brand.value, "globex");
        assert_eq!(brand.source, "logo_alt");

        let d = doc(
            "https://hooli.com/about",
            r#"<html><body><a href="https://hooli.com/">Hooli XYZ</a></body></html>"#,
        );
        assert_eq!(resolve_brand(&d).expect("brand").source, "home_link");
    }

    #[test]
    fn test_domain_fallback() {
        let d = doc("https://shop.umbrella.co.uk/x", "<html><body></body></html>");
        let brand = resolve_brand(&d).expect("brand");
        assert_eq!(brand.value, "umbrella");
        assert_eq!(brand.source, "domain");
    }
}
