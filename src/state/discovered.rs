//! Run-scoped collection of URLs that end up in the sitemap

use crate::url::normalize;
use std::collections::HashMap;

/// How a URL was discovered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Fetched successfully (HTML or any other 200 response)
    Page,
    /// Referenced from page markup as an image; never fetched
    Image,
}

/// A URL recorded during a crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredUrl {
    /// Absolute URL (normalized for same-origin references)
    pub url: String,
    pub kind: ResourceKind,
}

/// Discovery-ordered set of recorded URLs
///
/// A URL is stored at most once, compared by its normalized form; the first
/// spelling recorded is the one kept. Recording a page upgrades an earlier
/// image record in place, so Page wins while the original discovery position
/// is kept.
#[derive(Debug, Default)]
pub struct DiscoverySet {
    entries: Vec<DiscoveredUrl>,
    index: HashMap<String, usize>,
}

impl DiscoverySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a fetched page; returns true if the URL was not known before
    pub fn record_page(&mut self, url: &str) -> bool {
        match self.index.get(&normalize(url)) {
            Some(&position) => {
                self.entries[position].kind = ResourceKind::Page;
                false
            }
            None => {
                self.push(url, ResourceKind::Page);
                true
            }
        }
    }

    /// Records an image reference; returns true if the URL was not known before
    pub fn record_image(&mut self, url: &str) -> bool {
        if self.contains(url) {
            return false;
        }
        self.push(url, ResourceKind::Image);
        true
    }

    fn push(&mut self, url: &str, kind: ResourceKind) {
        self.index.insert(normalize(url), self.entries.len());
        self.entries.push(DiscoveredUrl {
            url: url.to_string(),
            kind,
        });
    }

    pub fn contains(&self, url: &str) -> bool {
        self.index.contains_key(&normalize(url))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of recorded URLs of the given kind
    pub fn count(&self, kind: ResourceKind) -> usize {
        self.entries.iter().filter(|entry| entry.kind == kind).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiscoveredUrl> {
        self.entries.iter()
    }

    /// Consumes the set, yielding entries in discovery order
    pub fn into_vec(self) -> Vec<DiscoveredUrl> {
        self.entries
    }
}
