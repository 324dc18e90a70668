//! Effective domain (eTLD+1) helpers

use std::net::IpAddr;
use url::Url;

/// Public suffixes made of two labels that are common enough to special-case.
///
/// This is not the full Public Suffix List; it covers the registries that
/// show up in practice so `shop.example.co.uk` resolves to `example.co.uk`.
const MULTI_LABEL_SUFFIXES: &[&str] = &[
    "co.uk", "org.uk", "ac.uk", "gov.uk", "me.uk", "ltd.uk", "plc.uk", "net.uk", "sch.uk",
    "com.au", "net.au", "org.au", "edu.au", "gov.au", "asn.au", "id.au",
    "co.nz", "org.nz", "net.nz", "govt.nz", "ac.nz",
    "co.jp", "ne.jp", "or.jp", "ac.jp", "go.jp",
    "co.kr", "or.kr", "ne.kr",
    "co.in", "net.in", "org.in", "firm.in", "gen.in", "ind.in",
    "com.br", "net.br", "org.br", "gov.br",
    "com.mx", "org.mx", "gob.mx",
    "com.ar", "com.cn", "net.cn", "org.cn", "gov.cn",
    "com.tr", "com.tw", "com.hk", "com.sg", "com.my", "com.ph", "com.vn",
    "co.za", "org.za", "co.il", "org.il", "co.id", "or.id", "co.th", "in.th",
    "com.ua", "com.pl", "com.es", "com.co", "com.pe", "com.ec", "com.ng", "com.eg",
    "com.sa", "com.pk", "com.bd",
];

/// Registrable domain for a hostname.
///
/// Lower-cases, strips a trailing dot, passes IP addresses and single-label
/// hosts through unchanged.
pub fn registrable_domain(host: &str) -> String {
    let host = host.trim().trim_end_matches('.').to_ascii_lowercase();
    if host.is_empty() || host.parse::<IpAddr>().is_ok() || host.starts_with('[') {
        return host;
    }

    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if labels.len() <= 2 {
        return labels.join(".");
    }

    let last_two = labels[labels.len() - 2..].join(".");
    let take = if MULTI_LABEL_SUFFIXES.contains(&last_two.as_str()) {
        3
    } else {
        2
    };
    labels[labels.len().saturating_sub(take)..].join(".")
}

/// Host of a URL string, if it parses as an absolute URL with a host
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
}

/// Whether two hosts share a registrable domain
pub fn same_site(a: &str, b: &str) -> bool {
    let (a, b) = (registrable_domain(a), registrable_domain(b));
    !a.is_empty() && a == b
}

/// The first label of the registrable domain, e.g. `acme` for `shop.acme.co.uk`
pub fn domain_label(host: &str) -> Option<String> {
    registrable_domain(host)
        .split('.')
        .next()
        .filter(|l| !l.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_domains() {
        assert_eq!(registrable_domain("www.example.com"), "example.com");
        assert_eq!(registrable_domain("a.b.c.example.org"), "example.org");
        assert_eq!(registrable_domain("example.com"), "example.com");
        assert_eq!(registrable_domain("Example.COM."), "example.com");
    }

    #[test]
    fn test_multi_label_suffixes() {
        assert_eq!(registrable_domain("shop.example.co.uk"), "example.co.uk");
        assert_eq!(registrable_domain("example.co.uk"), "example.co.uk");
        assert_eq!(registrable_domain("www.store.com.au"), "store.com.au");
    }

    #[test]
    fn test_passthrough() {
        assert_eq!(registrable_domain("localhost"), "localhost");
        assert_eq!(registrable_domain("127.0.0.1"), "127.0.0.1");
        assert_eq!(registrable_domain(""), "");
    }

    #[test]
    fn test_same_site_and_label() {
        assert!(same_site("blog.acme.com", "www.acme.com"));
        assert!(!same_site("acme.com", "acme.net"));
        assert_eq!(domain_label("shop.acme.co.uk").as_deref(), Some("acme"));
        assert_eq!(host_of("https://WWW.Acme.com/x").as_deref(), Some("www.acme.com"));
        assert_eq!(host_of("/relative"), None);
    }
}
