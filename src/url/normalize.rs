use crate::url::domain::base_domain;
use crate::UrlError;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Href prefixes that never name a crawlable or listable resource
const IGNORED_PREFIXES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Shape accepted for a seed URL before any parsing happens
static SEED_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^https?://[^\s<>"'()\[\]{}]+$"#).expect("seed url regex is valid")
});

/// Normalizes a URL according to Sumi-Sitemap's normalization rules
///
/// # Normalization Steps
///
/// 1. Parse the URL; if that fails, return the input unchanged
/// 2. Lowercase the host
/// 3. Remove the fragment (everything after #)
/// 4. Remove the trailing slash of a directory-style path (last segment has no
///    dot), except for the root path. File-style paths keep their slash as-is.
///
/// The function never fails and is idempotent.
///
/// # Examples
///
/// ```
/// use sumi_sitemap::url::normalize;
///
/// assert_eq!(normalize("https://EXAMPLE.com/about/#team"), "https://example.com/about");
/// assert_eq!(normalize("https://example.com/"), "https://example.com/");
/// assert_eq!(normalize("not a url"), "not a url");
/// ```
pub fn normalize(url_str: &str) -> String {
    match Url::parse(url_str) {
        Ok(url) => normalize_parsed(url).to_string(),
        Err(_) => url_str.to_string(),
    }
}

/// Applies the normalization rules to an already parsed URL
pub(crate) fn normalize_parsed(mut url: Url) -> Url {
    // Special schemes already arrive lowercased; opaque hosts do not
    if let Some(host) = url.host_str() {
        let lowered = host.to_lowercase();
        if lowered != host {
            let _ = url.set_host(Some(&lowered));
        }
    }

    url.set_fragment(None);

    if let Some(path) = strip_directory_slash(url.path()) {
        url.set_path(&path);
    }

    url
}

/// Returns the path without its trailing slashes when the final segment is a directory
fn strip_directory_slash(path: &str) -> Option<String> {
    if path.len() <= 1 || !path.ends_with('/') {
        return None;
    }

    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return Some("/".to_string());
    }

    let last_segment = trimmed.rsplit('/').next().unwrap_or_default();
    if last_segment.contains('.') {
        return None;
    }

    Some(trimmed.to_string())
}

/// Resolves an href found on a page against that page's URL
///
/// Returns `None` for empty hrefs, fragment-only hrefs and `javascript:`,
/// `mailto:`, `tel:` or `data:` references. Relative references are resolved
/// and normalized. An absolute href that points to another origin is returned
/// exactly as written, so external links are left intact for domain scoping to
/// filter out later.
///
/// # Examples
///
/// ```
/// use sumi_sitemap::url::resolve;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/docs/").unwrap();
/// assert_eq!(resolve("intro/", &base), Some("https://example.com/docs/intro".to_string()));
/// assert_eq!(resolve("mailto:me@example.com", &base), None);
/// ```
pub fn resolve(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') || has_ignored_prefix(href) {
        return None;
    }

    if let Ok(absolute) = Url::parse(href) {
        if base_domain(&absolute) != base_domain(base_url) {
            return Some(href.to_string());
        }
        return Some(normalize_parsed(absolute).to_string());
    }

    base_url
        .join(href)
        .ok()
        .map(|joined| normalize_parsed(joined).to_string())
}

/// Checks the ignored scheme prefixes case-insensitively
fn has_ignored_prefix(href: &str) -> bool {
    IGNORED_PREFIXES.iter().any(|prefix| {
        href.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

/// Validates and parses a seed URL before any crawling starts
///
/// The seed must be an `http`/`https` URL without whitespace, quotes, brackets
/// or angle brackets, and must carry a host.
///
/// # Returns
///
/// * `Ok(Url)` - The normalized seed URL
/// * `Err(UrlError)` - The seed is unusable
pub fn parse_seed_url(seed: &str) -> Result<Url, UrlError> {
    let seed = seed.trim();

    if !SEED_URL_RE.is_match(seed) {
        return if seed.contains("://") && !seed.starts_with("http") {
            Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS schemes are supported, got: {}",
                seed
            )))
        } else {
            Err(UrlError::Malformed(format!(
                "Expected a URL like https://example.com, got: {}",
                seed
            )))
        };
    }

    let url = Url::parse(seed).map_err(|e| UrlError::Parse(e.to_string()))?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    Ok(normalize_parsed(url))
}
