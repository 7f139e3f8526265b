//! Extension and keyword rules that classify URLs as pages, resources or images
//!
//! All checks work on the lowercased path (and query, for images) of a parsed
//! URL. Unparseable input is never classified as anything.

use url::Url;

/// Document extensions accepted as sitemap pages
pub const PAGE_EXTENSIONS: &[&str] = &[
    ".html", ".htm", ".php", ".asp", ".aspx", ".jsp", ".cfm", ".pdf", ".doc", ".docx", ".xls",
    ".xlsx", ".ppt", ".pptx",
];

/// Static resources referenced from `<link>` elements
pub const RESOURCE_EXTENSIONS: &[&str] = &[".css", ".js", ".xml", ".txt", ".pdf"];

/// Image file extensions
pub const IMAGE_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".webp", ".ico", ".tiff", ".tif",
];

/// Path fragments that suggest an image endpoint even without an extension
const IMAGE_KEYWORDS: &[&str] = &[
    "image", "img", "photo", "picture", "thumb", "avatar", "icon",
];

/// Returns true if the path ends with any of the given extensions
pub(crate) fn has_extension(path: &str, extensions: &[&str]) -> bool {
    extensions.iter().any(|ext| path.ends_with(ext))
}

fn lowercase_path(url: &Url) -> String {
    url.path().to_lowercase()
}

/// Checks whether a URL looks like a document worth listing and crawling
///
/// True for known document extensions, extensionless final segments
/// (dynamic routes) and directory paths ending in `/`.
///
/// # Examples
///
/// ```
/// use sumi_sitemap::url::classify_page;
///
/// assert!(classify_page("https://example.com/about"));
/// assert!(classify_page("https://example.com/report.PDF"));
/// assert!(!classify_page("https://example.com/style.css"));
/// ```
pub fn classify_page(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let path = lowercase_path(&parsed);

    if has_extension(&path, PAGE_EXTENSIONS) || path.ends_with('/') {
        return true;
    }

    let last_segment = path.rsplit('/').next().unwrap_or_default();
    !last_segment.contains('.')
}

/// Checks whether a URL is a static resource (stylesheet, script, feed, text, PDF)
pub fn classify_resource(url: &str) -> bool {
    Url::parse(url)
        .map(|parsed| has_extension(&lowercase_path(&parsed), RESOURCE_EXTENSIONS))
        .unwrap_or(false)
}

/// Checks whether a URL probably references an image
///
/// Deliberately permissive: an image extension on the path, an image keyword
/// anywhere in the path, or an image extension token in the query string all
/// qualify.
pub fn classify_image(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let path = lowercase_path(&parsed);

    if has_extension(&path, IMAGE_EXTENSIONS) {
        return true;
    }

    if IMAGE_KEYWORDS.iter().any(|keyword| path.contains(keyword)) {
        return true;
    }

    parsed.query().is_some_and(|query| {
        let query = query.to_lowercase();
        IMAGE_EXTENSIONS.iter().any(|ext| query.contains(ext))
    })
}
