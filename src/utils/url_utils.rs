//! URL manipulation utilities.
//!
//! This module provides functions for validating listing URLs and
//! classifying request hosts.

use url::Url;

/// Check if a URL is valid
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    // Skip data URLs, javascript URLs, and other non-http schemes
    if url.starts_with("data:") || url.starts_with("javascript:") || url.starts_with("mailto:") {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some(),
        Err(_) => false,
    }
}

/// Resolve a possibly relative reference against the page it was found on
///
/// Absolute references are returned unchanged. If the base cannot be parsed
/// the reference is returned as-is rather than dropped.
#[must_use]
pub fn resolve_against(base: &str, reference: &str) -> String {
    if Url::parse(reference).is_ok() {
        return reference.to_string();
    }

    match Url::parse(base).and_then(|b| b.join(reference)) {
        Ok(joined) => joined.to_string(),
        Err(_) => reference.to_string(),
    }
}

/// Extract the lowercase host of a URL, if it has one
#[must_use]
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
}

/// Whether `host` is `domain` or a subdomain of it
#[must_use]
pub fn host_matches_domain(host: &str, domain: &str) -> bool {
    let domain = domain.trim_start_matches('.');
    host == domain
        || (host.len() > domain.len()
            && host.ends_with(domain)
            && host.as_bytes()[host.len() - domain.len() - 1] == b'.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_urls_require_http_scheme_and_host() {
        assert!(is_valid_url("https://jp.mercari.com/item/m99511546897"));
        assert!(is_valid_url("http://example.com"));
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("jp.mercari.com/item/m1"));
        assert!(!is_valid_url("ftp://example.com/file"));
        assert!(!is_valid_url("javascript:alert(1)"));
    }

    #[test]
    fn relative_references_resolve_against_page() {
        assert_eq!(
            resolve_against("https://shop.example/item/1", "/img/a.jpg"),
            "https://shop.example/img/a.jpg"
        );
        assert_eq!(
            resolve_against("https://shop.example/item/1", "https://cdn.example/a.jpg"),
            "https://cdn.example/a.jpg"
        );
        assert_eq!(resolve_against("not a url", "a.jpg"), "a.jpg");
    }

    #[test]
    fn domain_matching_respects_label_boundaries() {
        assert!(host_matches_domain("doubleclick.net", "doubleclick.net"));
        assert!(host_matches_domain("stats.g.doubleclick.net", "doubleclick.net"));
        assert!(!host_matches_domain("notdoubleclick.net", "doubleclick.net"));
        assert!(!host_matches_domain("net", "doubleclick.net"));
    }
}
