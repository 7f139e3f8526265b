//! Sitemap document validation
//!
//! Checks any sitemap document, not only ones produced by [`serialize`]:
//! the root must be `urlset` in the sitemap namespace (prefixed or default),
//! there may be at most [`MAX_URLS`] `<url>` children, and each of them needs
//! a non-empty `<loc>` in the same namespace. The URL count is checked before
//! any missing `<loc>` is reported.
//!
//! [`serialize`]: crate::sitemap::serialize

use crate::sitemap::serializer::{MAX_URLS, SITEMAP_NAMESPACE};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use thiserror::Error;

/// Reasons a sitemap document is rejected
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Malformed XML: {0}")]
    Xml(String),

    #[error("Root element must be urlset in namespace {SITEMAP_NAMESPACE}, found {found}")]
    InvalidNamespace { found: String },

    #[error("Sitemap contains {count} URLs, more than the maximum of {max}")]
    TooManyUrls { count: usize, max: usize },

    #[error("URL entry {index} has no loc")]
    MissingLoc { index: usize },
}

/// Describes an element as `{namespace}name` for error messages
fn qualified_name(ns: &ResolveResult<'_>, element: &BytesStart<'_>) -> String {
    let local = String::from_utf8_lossy(element.local_name().as_ref()).into_owned();
    match ns {
        ResolveResult::Bound(Namespace(uri)) => {
            format!("{{{}}}{}", String::from_utf8_lossy(uri), local)
        }
        _ => local,
    }
}

fn in_sitemap_namespace(ns: &ResolveResult<'_>) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == SITEMAP_NAMESPACE.as_bytes())
}

/// Progress through the `<url>` element currently open
#[derive(Debug, Default)]
struct UrlScan {
    count: usize,
    in_url: bool,
    in_loc: bool,
    has_loc: bool,
    /// Index of the first `<url>` closed without a `<loc>`
    missing_loc: Option<usize>,
}

impl UrlScan {
    fn open_url(&mut self) {
        self.count += 1;
        self.in_url = true;
        self.has_loc = false;
    }

    /// Closes the current `<url>`, remembering it if no `<loc>` had text
    fn close_url(&mut self) {
        self.in_url = false;
        if !self.has_loc && self.missing_loc.is_none() {
            self.missing_loc = Some(self.count - 1);
        }
    }
}

/// Validates a sitemap document and returns its URL count
///
/// # Examples
///
/// ```
/// use sumi_sitemap::validate;
///
/// let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
///   <url><loc>https://example.com/</loc></url>
/// </urlset>"#;
/// assert_eq!(validate(xml), Ok(1));
/// ```
pub fn validate(xml: &str) -> Result<usize, ValidationError> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut depth = 0usize;
    let mut seen_root = false;
    let mut scan = UrlScan::default();

    loop {
        let (ns, event) = reader
            .read_resolved_event()
            .map_err(|e| ValidationError::Xml(e.to_string()))?;

        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_empty = matches!(event, Event::Empty(_));
                let local = e.local_name();
                let local = local.as_ref();

                match depth {
                    0 => {
                        if seen_root {
                            return Err(ValidationError::Xml(
                                "multiple root elements".to_string(),
                            ));
                        }
                        if local != b"urlset" || !in_sitemap_namespace(&ns) {
                            return Err(ValidationError::InvalidNamespace {
                                found: qualified_name(&ns, e),
                            });
                        }
                        seen_root = true;
                    }
                    1 if local == b"url" && in_sitemap_namespace(&ns) => {
                        scan.open_url();
                        if is_empty {
                            scan.close_url();
                        }
                    }
                    2 if scan.in_url
                        && local == b"loc"
                        && in_sitemap_namespace(&ns)
                        && !is_empty =>
                    {
                        scan.in_loc = true;
                    }
                    _ => {}
                }

                if !is_empty {
                    depth += 1;
                }
            }
            Event::Text(ref e) if scan.in_loc => {
                let text = e.unescape().map_err(|e| ValidationError::Xml(e.to_string()))?;
                if !text.trim().is_empty() {
                    scan.has_loc = true;
                }
            }
            Event::CData(ref e) if scan.in_loc => {
                if !e.iter().all(u8::is_ascii_whitespace) {
                    scan.has_loc = true;
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                match depth {
                    2 => scan.in_loc = false,
                    1 if scan.in_url => scan.close_url(),
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(ValidationError::Xml("document has no root element".to_string()));
    }
    if depth != 0 {
        return Err(ValidationError::Xml("unexpected end of document".to_string()));
    }
    if scan.count > MAX_URLS {
        return Err(ValidationError::TooManyUrls {
            count: scan.count,
            max: MAX_URLS,
        });
    }
    if let Some(index) = scan.missing_loc {
        return Err(ValidationError::MissingLoc { index });
    }

    Ok(scan.count)
}
