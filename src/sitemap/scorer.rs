//! Metadata scoring for discovered URLs
//!
//! Change frequency and priority come from ordered path rule tables: the first
//! matching rule wins. Keyword rules match whole directory segments, so the
//! normalized `/about` matches the `/about/` keyword just like `/about/team`.
//! `lastmod` is read from a best-effort HEAD request.

use crate::crawler::fetch_last_modified;
use crate::sitemap::entry::{ChangeFrequency, Priority, SitemapEntry};
use crate::state::DiscoveredUrl;
use crate::url::{has_extension, IMAGE_EXTENSIONS};
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Paths treated as the site's home page
const HOME_PATHS: &[&str] = &["/", "/index.html", "/index.php"];

/// A predicate over a lowercased URL path
#[derive(Debug, Clone, Copy)]
enum PathRule {
    /// Path contains one of the directory keywords
    Contains(&'static [&'static str]),
    /// Path ends with one of the extensions
    EndsWith(&'static [&'static str]),
    /// Path equals one of the values
    Exact(&'static [&'static str]),
}

impl PathRule {
    fn matches(&self, path: &str) -> bool {
        match self {
            Self::Contains(keywords) => {
                let directory = as_directory(path);
                keywords.iter().any(|keyword| directory.contains(keyword))
            }
            Self::EndsWith(extensions) => has_extension(path, extensions),
            Self::Exact(values) => values.contains(&path),
        }
    }
}

const CHANGE_FREQUENCY_RULES: &[(PathRule, ChangeFrequency)] = &[
    (
        PathRule::Contains(&["/blog/", "/news/", "/posts/", "/articles/"]),
        ChangeFrequency::Daily,
    ),
    (
        PathRule::Contains(&["/products/", "/services/", "/portfolio/"]),
        ChangeFrequency::Weekly,
    ),
    (PathRule::EndsWith(IMAGE_EXTENSIONS), ChangeFrequency::Yearly),
    (
        PathRule::Contains(&["/about/", "/contact/", "/privacy/", "/terms/"]),
        ChangeFrequency::Monthly,
    ),
    (PathRule::Exact(HOME_PATHS), ChangeFrequency::Weekly),
];

const DEFAULT_CHANGE_FREQUENCY: ChangeFrequency = ChangeFrequency::Monthly;

// The seed/home rule (1.0) is checked before this table
const PRIORITY_RULES: &[(PathRule, Priority)] = &[
    (
        PathRule::Contains(&["/about/", "/contact/", "/services/", "/products/"]),
        Priority::from_tenths(8),
    ),
    (
        PathRule::Contains(&["/blog/", "/news/", "/articles/"]),
        Priority::from_tenths(7),
    ),
    (PathRule::EndsWith(IMAGE_EXTENSIONS), Priority::from_tenths(4)),
    (
        PathRule::EndsWith(&[".css", ".js", ".pdf"]),
        Priority::from_tenths(3),
    ),
];

/// Appends `/` so keyword rules see the last segment as a directory
fn as_directory(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
    }
}

/// Lowercased path of a URL; unparseable input has an empty path
fn lowercase_path(url: &str) -> String {
    Url::parse(url)
        .map(|parsed| parsed.path().to_lowercase())
        .unwrap_or_default()
}

/// Determines how often a URL is expected to change
///
/// # Examples
///
/// ```
/// use sumi_sitemap::sitemap::change_frequency;
/// use sumi_sitemap::ChangeFrequency;
///
/// assert_eq!(change_frequency("https://example.com/blog/first-post"), ChangeFrequency::Daily);
/// assert_eq!(change_frequency("https://example.com/logo.png"), ChangeFrequency::Yearly);
/// ```
pub fn change_frequency(url: &str) -> ChangeFrequency {
    let path = lowercase_path(url);
    CHANGE_FREQUENCY_RULES
        .iter()
        .find(|(rule, _)| rule.matches(&path))
        .map(|(_, freq)| *freq)
        .unwrap_or(DEFAULT_CHANGE_FREQUENCY)
}

/// Computes the priority of a URL relative to the crawl's seed URL
///
/// # Examples
///
/// ```
/// use sumi_sitemap::sitemap::priority;
///
/// let seed = "https://example.com/";
/// assert_eq!(priority(seed, seed).to_string(), "1.0");
/// assert_eq!(priority("https://example.com/about", seed).to_string(), "0.8");
/// assert_eq!(priority("https://example.com/a/b/c/d", seed).to_string(), "0.5");
/// ```
pub fn priority(url: &str, seed_url: &str) -> Priority {
    let path = lowercase_path(url);

    if url == seed_url || HOME_PATHS.contains(&path.as_str()) {
        return Priority::MAX;
    }

    if let Some((_, value)) = PRIORITY_RULES.iter().find(|(rule, _)| rule.matches(&path)) {
        return *value;
    }

    let segments = path.split('/').filter(|s| !s.is_empty()).count();
    match segments {
        0 | 1 => Priority::from_tenths(9),
        2 => Priority::from_tenths(7),
        3 => Priority::from_tenths(6),
        _ => Priority::from_tenths(5),
    }
}

/// Reads a URL's last modification time, falling back to `now`
pub async fn last_modified(client: &Client, url: &str, timeout: Duration) -> DateTime<Utc> {
    fetch_last_modified(client, url, timeout)
        .await
        .unwrap_or_else(Utc::now)
}

/// Builds the entry for one discovered URL, without the HEAD request
pub fn score_offline(discovered: &DiscoveredUrl, seed_url: &str) -> SitemapEntry {
    SitemapEntry {
        url: discovered.url.clone(),
        kind: discovered.kind,
        last_modified: None,
        change_frequency: Some(change_frequency(&discovered.url)),
        priority: Some(priority(&discovered.url, seed_url)),
    }
}

/// Scores every discovered URL and returns entries ordered by priority
///
/// HEAD requests run one at a time, in discovery order.
pub async fn score_all(
    client: &Client,
    discovered: &[DiscoveredUrl],
    seed_url: &str,
    head_timeout: Duration,
) -> Vec<SitemapEntry> {
    let mut entries = Vec::with_capacity(discovered.len());

    for item in discovered {
        let mut entry = score_offline(item, seed_url);
        entry.last_modified = Some(last_modified(client, &item.url, head_timeout).await);
        entries.push(entry);
    }

    sort_by_priority(&mut entries);
    entries
}

/// Sorts entries by descending priority, keeping discovery order for ties
pub fn sort_by_priority(entries: &mut [SitemapEntry]) {
    // sort_by is stable
    entries.sort_by(|a, b| b.priority.cmp(&a.priority));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ResourceKind;

    const SEED: &str = "https://example.com/";

    fn p(tenths: u8) -> Priority {
        Priority::from_tenths(tenths)
    }

    #[test]
    fn test_change_frequency_content_sections() {
        assert_eq!(change_frequency("https://example.com/blog/post-1"), ChangeFrequency::Daily);
        assert_eq!(change_frequency("https://example.com/news"), ChangeFrequency::Daily);
        assert_eq!(change_frequency("https://example.com/posts/a/b"), ChangeFrequency::Daily);
        assert_eq!(change_frequency("https://example.com/ARTICLES/x"), ChangeFrequency::Daily);
    }

    #[test]
    fn test_change_frequency_commercial_sections() {
        assert_eq!(change_frequency("https://example.com/products/widget"), ChangeFrequency::Weekly);
        assert_eq!(change_frequency("https://example.com/services"), ChangeFrequency::Weekly);
        assert_eq!(change_frequency("https://example.com/portfolio/2024"), ChangeFrequency::Weekly);
    }

    #[test]
    fn test_change_frequency_images() {
        assert_eq!(change_frequency("https://example.com/logo.png"), ChangeFrequency::Yearly);
        assert_eq!(change_frequency("https://cdn.example.net/a/B.JPG"), ChangeFrequency::Yearly);
    }

    #[test]
    fn test_change_frequency_rule_order() {
        // Blog rule is checked before the image rule
        assert_eq!(change_frequency("https://example.com/blog/cover.png"), ChangeFrequency::Daily);
        // Image rule is checked before the static-page rule
        assert_eq!(change_frequency("https://example.com/about/team.jpg"), ChangeFrequency::Yearly);
    }

    #[test]
    fn test_change_frequency_static_and_home() {
        assert_eq!(change_frequency("https://example.com/about"), ChangeFrequency::Monthly);
        assert_eq!(change_frequency("https://example.com/privacy"), ChangeFrequency::Monthly);
        assert_eq!(change_frequency("https://example.com/"), ChangeFrequency::Weekly);
        assert_eq!(change_frequency("https://example.com/index.php"), ChangeFrequency::Weekly);
        assert_eq!(change_frequency("https://example.com/misc/page"), ChangeFrequency::Monthly);
    }

    #[test]
    fn test_keywords_match_whole_segments() {
        assert_eq!(change_frequency("https://example.com/newsletter"), ChangeFrequency::Monthly);
        assert_eq!(priority("https://example.com/aboutface", SEED), p(9));
    }

    #[test]
    fn test_priority_home_and_seed() {
        assert_eq!(priority(SEED, SEED), Priority::MAX);
        assert_eq!(priority("https://example.com/index.html", SEED), Priority::MAX);
        assert_eq!(
            priority("https://example.com/start", "https://example.com/start"),
            Priority::MAX
        );
    }

    #[test]
    fn test_priority_sections() {
        assert_eq!(priority("https://example.com/about", SEED), p(8));
        assert_eq!(priority("https://example.com/contact/form", SEED), p(8));
        assert_eq!(priority("https://example.com/products/a/b/c", SEED), p(8));
        assert_eq!(priority("https://example.com/blog/post", SEED), p(7));
        assert_eq!(priority("https://example.com/news", SEED), p(7));
    }

    #[test]
    fn test_priority_assets() {
        assert_eq!(priority("https://example.com/logo.png", SEED), p(4));
        assert_eq!(priority("https://example.com/css/site.css", SEED), p(3));
        assert_eq!(priority("https://example.com/app.js", SEED), p(3));
        assert_eq!(priority("https://example.com/docs/guide.pdf", SEED), p(3));
    }

    #[test]
    fn test_priority_by_depth() {
        assert_eq!(priority("https://example.com/pricing", SEED), p(9));
        assert_eq!(priority("https://example.com/a/b", SEED), p(7));
        assert_eq!(priority("https://example.com/a/b/c", SEED), p(6));
        assert_eq!(priority("https://example.com/a/b/c/d", SEED), p(5));
        assert_eq!(priority("https://example.com/a/b/c/d/e/f", SEED), p(5));
    }

    #[test]
    fn test_priority_within_bounds() {
        let urls = [
            SEED,
            "https://example.com/about",
            "https://example.com/x.png",
            "https://example.com/x/y/z/w",
            "not a url",
        ];
        for url in urls {
            let value = priority(url, SEED);
            assert!(value >= Priority::MIN && value <= Priority::MAX);
        }
    }

    #[test]
    fn test_score_offline() {
        let discovered = DiscoveredUrl {
            url: "https://example.com/logo.png".to_string(),
            kind: ResourceKind::Image,
        };
        let entry = score_offline(&discovered, SEED);
        assert_eq!(entry.kind, ResourceKind::Image);
        assert_eq!(entry.change_frequency, Some(ChangeFrequency::Yearly));
        assert_eq!(entry.priority, Some(p(4)));
        assert!(entry.last_modified.is_none());
    }

    #[test]
    fn test_sort_is_descending_and_stable() {
        let mut entries: Vec<SitemapEntry> = [
            ("https://example.com/one", 7),
            ("https://example.com/", 10),
            ("https://example.com/two", 7),
            ("https://example.com/three", 9),
            ("https://example.com/four", 7),
        ]
        .into_iter()
        .map(|(url, tenths)| {
            let mut entry = SitemapEntry::new(url);
            entry.priority = Some(p(tenths));
            entry
        })
        .collect();

        sort_by_priority(&mut entries);

        let urls: Vec<&str> = entries.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com/",
                "https://example.com/three",
                "https://example.com/one",
                "https://example.com/two",
                "https://example.com/four",
            ]
        );
    }
}
