//! Sitemap generation
//!
//! - `entry`: the `<url>` model (`SitemapEntry`, `ChangeFrequency`, `Priority`)
//! - `scorer`: change frequency, priority and `lastmod` for discovered URLs
//! - `serializer`: XML output in the sitemaps.org format
//! - `validator`: protocol checks for any sitemap document

mod entry;
mod scorer;
mod serializer;
mod validator;

pub use entry::{format_lastmod, ChangeFrequency, FieldError, Priority, SitemapEntry};
pub use scorer::{
    change_frequency, last_modified, priority, score_all, score_offline, sort_by_priority,
};
pub use serializer::{serialize, MAX_LOC_LENGTH, MAX_URLS, SITEMAP_NAMESPACE};
pub use validator::{validate, ValidationError};
