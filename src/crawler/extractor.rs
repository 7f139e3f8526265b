//! HTML extraction of outbound links and image references
//!
//! Links come from anchors, forms and `<link>` elements. Images come from a
//! wide set of structural sources (see [`extract_images`]). Every candidate is
//! resolved against the page URL, classified, and collected in document order
//! with duplicates collapsed.

use crate::url::{classify_image, classify_page, classify_resource, normalize, resolve};
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

/// `background` / `background-image` declarations in inline styles
static BACKGROUND_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)background(?:-image)?\s*:[^;]*?url\(\s*['"]?([^'")]+?)['"]?\s*\)"#)
        .expect("background url regex is valid")
});

/// Quoted strings ending in an image extension inside script bodies
static SCRIPT_IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)["']([^"'\s]+?\.(?:jpe?g|png|gif|bmp|svg|webp|ico|tiff?))["']"#)
        .expect("script image regex is valid")
});

/// Meta tags whose content is a share image
const META_IMAGE_KEYS: &[&str] = &["og:image", "twitter:image", "twitter:image:src"];

/// Links and images extracted from one HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Page and resource candidates, in document order
    pub links: Vec<String>,

    /// Image references, in document order (empty unless requested)
    pub images: Vec<String>,
}

/// Document-ordered set of resolved URLs
///
/// Membership is keyed on the normalized form, so off-domain references that
/// `resolve` leaves as written still collapse; the first spelling is kept.
#[derive(Debug, Default)]
struct UrlSet {
    seen: HashSet<String>,
    urls: Vec<String>,
}

impl UrlSet {
    fn insert(&mut self, url: String) {
        if self.seen.insert(normalize(&url)) {
            self.urls.push(url);
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.urls
    }
}

/// Parses HTML content and extracts links and, optionally, images
///
/// # Example
///
/// ```
/// use sumi_sitemap::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<a href="/about/">About</a><img src="/logo.png">"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url, true);
/// assert_eq!(parsed.links, vec!["https://example.com/about"]);
/// assert_eq!(parsed.images, vec!["https://example.com/logo.png"]);
/// ```
pub fn parse_html(html: &str, base_url: &Url, include_images: bool) -> ParsedPage {
    let document = Html::parse_document(html);

    let links = extract_links(&document, base_url);
    let images = if include_images {
        extract_images(&document, base_url)
    } else {
        Vec::new()
    };

    ParsedPage { links, images }
}

/// Extracts crawl candidates from the document
///
/// # Rules
///
/// - `<a href>` and `<form action>`: kept when the target looks like a page
/// - `<link href>`: kept when the target is a static resource
pub fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let mut links = UrlSet::default();

    for (selector, attr) in [("a[href]", "href"), ("form[action]", "action")] {
        for value in attr_values(document, selector, attr) {
            if let Some(url) = resolve(value, base_url) {
                if classify_page(&url) {
                    links.insert(url);
                }
            }
        }
    }

    for value in attr_values(document, "link[href]", "href") {
        if let Some(url) = resolve(value, base_url) {
            if classify_resource(&url) {
                links.insert(url);
            }
        }
    }

    links.into_vec()
}

/// Extracts image references from the document
///
/// # Sources
///
/// - `<img src>`, `<img data-src>`, `<img srcset>` and `<source srcset>`
/// - inline `style` attributes with `background`/`background-image: url(...)`
/// - `<link rel="...icon...">` variants (favicon, apple-touch-icon, ...)
/// - `<meta>` share images (`og:image`, `twitter:image`, `twitter:image:src`)
/// - any `data-*` attribute whose name contains `img`
/// - quoted image paths inside inline `<script>` bodies
///
/// Candidates are resolved and kept only when they look like images.
pub fn extract_images(document: &Html, base_url: &Url) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();

    candidates.extend(attr_values(document, "img[src]", "src").map(str::to_string));
    candidates.extend(attr_values(document, "img[data-src]", "data-src").map(str::to_string));

    for selector in ["img[srcset]", "source[srcset]"] {
        for srcset in attr_values(document, selector, "srcset") {
            candidates.extend(srcset_urls(srcset));
        }
    }

    for style in attr_values(document, "[style]", "style") {
        candidates.extend(
            BACKGROUND_URL_RE
                .captures_iter(style)
                .map(|caps| caps[1].to_string()),
        );
    }

    candidates.extend(
        attr_values(document, r#"link[rel*="icon"][href]"#, "href").map(str::to_string),
    );
    candidates.extend(meta_image_urls(document));
    candidates.extend(data_img_attr_values(document));
    candidates.extend(script_image_urls(document));

    let mut images = UrlSet::default();
    for candidate in candidates {
        if let Some(url) = resolve(&candidate, base_url) {
            if classify_image(&url) {
                images.insert(url);
            }
        }
    }

    images.into_vec()
}

/// Yields the attribute of every element matching the selector
fn attr_values<'a>(
    document: &'a Html,
    selector: &str,
    attr: &'static str,
) -> impl Iterator<Item = &'a str> {
    let selector = Selector::parse(selector).ok();
    selector
        .into_iter()
        .flat_map(move |selector| {
            document
                .select(&selector)
                .filter_map(|element| element.value().attr(attr))
                .collect::<Vec<_>>()
        })
}

/// Returns the URL token of each comma-separated srcset entry
fn srcset_urls(srcset: &str) -> Vec<String> {
    srcset
        .split(',')
        .filter_map(|entry| entry.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

fn meta_image_urls(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("meta[content]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter(|element| {
            let value = element.value();
            value
                .attr("property")
                .or_else(|| value.attr("name"))
                .is_some_and(|key| META_IMAGE_KEYS.contains(&key.to_lowercase().as_str()))
        })
        .filter_map(|element| element.value().attr("content"))
        .map(str::to_string)
        .collect()
}

/// Values of `data-*img*` attributes such as `data-img` or `data-bg-img`
fn data_img_attr_values(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("*") else {
        return Vec::new();
    };

    let mut values = Vec::new();
    for element in document.select(&selector) {
        for (name, value) in element.value().attrs() {
            if name.starts_with("data-") && name.contains("img") {
                values.push(value.to_string());
            }
        }
    }
    values
}

fn script_image_urls(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("script") else {
        return Vec::new();
    };

    let mut values = Vec::new();
    for element in document.select(&selector) {
        let text: String = element.text().collect();
        values.extend(
            SCRIPT_IMAGE_RE
                .captures_iter(&text)
                .map(|caps| caps[1].to_string()),
        );
    }
    values
}
