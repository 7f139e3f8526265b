//! Sitemap XML serialization
//!
//! Writes entries as a `urlset` document in the sitemaps.org namespace with
//! two-space indentation. Text content is escaped by quick-xml.

use crate::sitemap::entry::SitemapEntry;
use crate::SumiError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::warn;

/// Namespace of the sitemap protocol
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Maximum number of `<url>` entries per document
pub const MAX_URLS: usize = 50_000;

/// Maximum length of a `<loc>` value, in characters
pub const MAX_LOC_LENGTH: usize = 2048;

/// Returns whether an entry's `loc` can be written
fn has_valid_loc(entry: &SitemapEntry) -> bool {
    !entry.url.is_empty() && entry.url.chars().count() <= MAX_LOC_LENGTH
}

/// Serializes entries into a sitemap document
///
/// Entries with an empty `loc` or one longer than [`MAX_LOC_LENGTH`] are
/// dropped with a warning. The [`MAX_URLS`] ceiling is not enforced here;
/// [`validate`](crate::sitemap::validate) reports documents that exceed it.
///
/// # Examples
///
/// ```
/// use sumi_sitemap::{serialize, SitemapEntry};
///
/// let xml = serialize(&[SitemapEntry::new("https://example.com/?a=1&b=2")]).unwrap();
/// assert!(xml.contains("<loc>https://example.com/?a=1&amp;b=2</loc>"));
/// ```
pub fn serialize(entries: &[SitemapEntry]) -> Result<String, SumiError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write(
        &mut writer,
        Event::Start(BytesStart::new("urlset").with_attributes([("xmlns", SITEMAP_NAMESPACE)])),
    )?;

    for entry in entries {
        if !has_valid_loc(entry) {
            warn!(
                "Dropping sitemap entry with invalid loc ({} chars): {:.80}",
                entry.url.chars().count(),
                entry.url
            );
            continue;
        }
        write_entry(&mut writer, entry)?;
    }

    write(&mut writer, Event::End(BytesEnd::new("urlset")))?;

    let mut xml = String::from_utf8(writer.into_inner())
        .map_err(|e| SumiError::Serialization(e.to_string()))?;
    xml.push('\n');
    Ok(xml)
}

fn write_entry(writer: &mut Writer<Vec<u8>>, entry: &SitemapEntry) -> Result<(), SumiError> {
    write(writer, Event::Start(BytesStart::new("url")))?;

    write_text_element(writer, "loc", &entry.url)?;
    if let Some(lastmod) = entry.lastmod_text() {
        write_text_element(writer, "lastmod", &lastmod)?;
    }
    if let Some(freq) = entry.change_frequency {
        write_text_element(writer, "changefreq", freq.as_str())?;
    }
    if let Some(priority) = entry.priority {
        write_text_element(writer, "priority", &priority.to_string())?;
    }

    write(writer, Event::End(BytesEnd::new("url")))
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<(), SumiError> {
    write(writer, Event::Start(BytesStart::new(name)))?;
    write(writer, Event::Text(BytesText::new(text)))?;
    write(writer, Event::End(BytesEnd::new(name)))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), SumiError> {
    writer
        .write_event(event)
        .map_err(|e| SumiError::Serialization(e.to_string()))
}
