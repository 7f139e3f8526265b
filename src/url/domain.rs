use url::Url;

/// Returns the `scheme://host[:port]` origin of a URL
///
/// The host is lowercase and default ports are omitted. URLs with an opaque
/// origin (`data:`, `mailto:` and similar) have no base domain.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_sitemap::url::base_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(base_domain(&url), Some("https://example.com".to_string()));
///
/// let url = Url::parse("http://localhost:8080/").unwrap();
/// assert_eq!(base_domain(&url), Some("http://localhost:8080".to_string()));
/// ```
pub fn base_domain(url: &Url) -> Option<String> {
    let origin = url.origin();
    if origin.is_tuple() {
        Some(origin.ascii_serialization())
    } else {
        None
    }
}

/// Checks whether a URL shares scheme and host with the crawl's base domain
///
/// Comparison is exact apart from host case: no wildcard or subdomain
/// matching, and `http` never matches `https`.
pub fn is_same_domain(url: &str, base_domain_str: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };

    let expected = base_domain_str.trim_end_matches('/').to_ascii_lowercase();
    base_domain(&parsed).is_some_and(|domain| domain == expected)
}
