//! JSON-LD extraction and schema.org type matching
//!
//! Every `application/ld+json` block is parsed independently; a malformed
//! block is counted and skipped. Top-level arrays and `@graph` wrappers are
//! flattened so callers see one list of entity nodes.

use scraper::{Html, Selector};
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

static LD_JSON_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#)
        .expect("BUG: hardcoded CSS selector for ld+json is invalid")
});

/// Types treated as the site's own organization entity
pub const ORGANIZATION_TYPES: &[&str] = &[
    "Organization",
    "Corporation",
    "LocalBusiness",
    "OnlineStore",
    "OnlineBusiness",
    "NewsMediaOrganization",
    "EducationalOrganization",
    "NGO",
    "Store",
    "Restaurant",
    "ProfessionalService",
];

/// Types accepted as a brand-name source
pub const BRAND_SOURCE_TYPES: &[&str] = &["Organization", "WebSite", "LocalBusiness", "Corporation"];

/// Entity kinds that count toward entity-graph coverage
pub const ENTITY_TYPES: &[&str] = &["Organization", "Product", "Person"];

/// Flattened JSON-LD nodes of one page
#[derive(Debug, Clone, Default)]
pub struct StructuredData {
    pub nodes: Vec<Value>,
    pub blocks: usize,
    pub invalid_blocks: usize,
}

impl StructuredData {
    /// Extract every JSON-LD block from a parsed document
    pub fn extract(document: &Html) -> Self {
        let mut data = StructuredData::default();
        for script in document.select(&LD_JSON_SELECTOR) {
            data.blocks += 1;
            let raw: String = script.text().collect();
            match serde_json::from_str::<Value>(raw.trim()) {
                Ok(value) => flatten_into(value, &mut data.nodes),
                Err(e) => {
                    debug!("Skipping malformed JSON-LD block: {}", e);
                    data.invalid_blocks += 1;
                }
            }
        }
        data
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes whose `@type` intersects `types`
    pub fn nodes_of<'a>(&'a self, types: &'a [&'a str]) -> impl Iterator<Item = &'a Value> + 'a {
        self.nodes.iter().filter(move |n| has_any_type(n, types))
    }

    /// First Organization-like node
    pub fn organization(&self) -> Option<&Value> {
        self.nodes_of(ORGANIZATION_TYPES).next()
    }

    /// `name` of the first brand-bearing node (Organization, WebSite, LocalBusiness)
    pub fn brand_name(&self) -> Option<String> {
        self.nodes_of(BRAND_SOURCE_TYPES)
            .filter_map(|n| string_field(n, "name"))
            .next()
    }

    /// Whether any node is of the given type
    pub fn has_entity(&self, kind: &str) -> bool {
        self.nodes.iter().any(|n| has_any_type(n, &[kind]))
    }

    /// Number of well-formed Question/acceptedAnswer pairs across FAQPage nodes
    pub fn faq_pairs(&self) -> usize {
        self.nodes_of(&["FAQPage"])
            .map(|page| {
                as_list(page.get("mainEntity"))
                    .into_iter()
                    .filter(|q| is_valid_question(q))
                    .count()
            })
            .sum()
    }

    /// Whether any FAQPage node exists
    pub fn has_faq_page(&self) -> bool {
        self.has_entity("FAQPage")
    }
}

fn flatten_into(value: Value, out: &mut Vec<Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                flatten_into(item, out);
            }
        }
        Value::Object(mut map) => {
            if let Some(graph) = map.remove("@graph") {
                flatten_into(graph, out);
            }
            if map.contains_key("@type") {
                out.push(Value::Object(map));
            }
        }
        _ => {}
    }
}

/// Normalize a type IRI like `https://schema.org/Organization` to `Organization`
fn short_type(raw: &str) -> &str {
    raw.rsplit(['/', '#', ':']).next().unwrap_or(raw).trim()
}

/// Normalized `@type` values of a node (string or array form)
pub fn node_types(node: &Value) -> Vec<String> {
    match node.get("@type") {
        Some(Value::String(s)) => vec![short_type(s).to_string()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|s| short_type(s).to_string())
            .collect(),
        _ => Vec::new(),
    }
}

/// Whether a node's `@type` matches any of `types` (case-insensitive)
pub fn has_any_type(node: &Value, types: &[&str]) -> bool {
    node_types(node)
        .iter()
        .any(|t| types.iter().any(|want| t.eq_ignore_ascii_case(want)))
}

/// Non-empty trimmed string field
pub fn string_field(node: &Value, key: &str) -> Option<String> {
    node.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Treat a missing value as empty, a single object as a one-element list
pub fn as_list(value: Option<&Value>) -> Vec<&Value> {
    match value {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![other],
    }
}

fn is_valid_question(node: &Value) -> bool {
    if !has_any_type(node, &["Question"]) || string_field(node, "name").is_none() {
        return false;
    }
    as_list(node.get("acceptedAnswer")).into_iter().any(|answer| {
        let typed_ok = node_types(answer).is_empty() || has_any_type(answer, &["Answer"]);
        typed_ok && string_field(answer, "text").is_some()
    })
}

/// Number of distinct `sameAs` links on a node
pub fn same_as_count(node: &Value) -> usize {
    let mut links: Vec<&str> = as_list(node.get("sameAs"))
        .into_iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    links.sort_unstable();
    links.dedup();
    links.len()
}

/// Whether a node carries a usable `logo` (URL string or ImageObject with url)
pub fn has_logo(node: &Value) -> bool {
    match node.get("logo") {
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(obj @ Value::Object(_)) => {
            string_field(obj, "url").is_some() || string_field(obj, "contentUrl").is_some()
        }
        _ => false,
    }
}
