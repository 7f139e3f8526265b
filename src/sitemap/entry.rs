//! Sitemap entry types

use crate::state::ResourceKind;
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Format used for `<lastmod>` values
const LASTMOD_FORMAT: &str = "%Y-%m-%dT%H:%M:%S+00:00";

/// Errors raised when parsing sitemap field values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("Unknown change frequency: {0}")]
    ChangeFrequency(String),

    #[error("Priority must be a decimal between 0.0 and 1.0 with one fractional digit, got '{0}'")]
    Priority(String),
}

/// Protocol `changefreq` tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub const ALL: [ChangeFrequency; 7] = [
        Self::Always,
        Self::Hourly,
        Self::Daily,
        Self::Weekly,
        Self::Monthly,
        Self::Yearly,
        Self::Never,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeFrequency {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|freq| freq.as_str() == s.trim())
            .ok_or_else(|| FieldError::ChangeFrequency(s.to_string()))
    }
}

/// Sitemap priority, an exact decimal in [0.0, 1.0] with one fractional digit
///
/// Stored as tenths so that comparisons never go through floating point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(u8);

impl Priority {
    pub const MIN: Priority = Priority(0);
    pub const MAX: Priority = Priority(10);

    /// Builds a priority from tenths; panics (at compile time in const context) above 10
    pub const fn from_tenths(tenths: u8) -> Self {
        assert!(tenths <= 10, "priority above 1.0");
        Priority(tenths)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

impl FromStr for Priority {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FieldError::Priority(s.to_string());

        let (whole, fraction) = s.trim().split_once('.').ok_or_else(invalid)?;
        if fraction.len() != 1 {
            return Err(invalid());
        }

        let whole: u8 = whole.parse().map_err(|_| invalid())?;
        let fraction: u8 = fraction.parse().map_err(|_| invalid())?;
        let tenths = whole
            .checked_mul(10)
            .and_then(|w| w.checked_add(fraction))
            .ok_or_else(invalid)?;

        if tenths > Self::MAX.0 {
            return Err(invalid());
        }
        Ok(Priority(tenths))
    }
}

/// One `<url>` element of a sitemap
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    /// Absolute URL written to `<loc>`
    pub url: String,

    /// Whether the URL was fetched as a page or referenced as an image
    pub kind: ResourceKind,

    pub last_modified: Option<DateTime<Utc>>,
    pub change_frequency: Option<ChangeFrequency>,
    pub priority: Option<Priority>,
}

impl SitemapEntry {
    /// Creates a page entry with no optional metadata
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: ResourceKind::Page,
            last_modified: None,
            change_frequency: None,
            priority: None,
        }
    }

    /// `<lastmod>` text, if a date is present
    pub fn lastmod_text(&self) -> Option<String> {
        self.last_modified.map(format_lastmod)
    }
}

/// Formats a timestamp the way `<lastmod>` values are written
pub fn format_lastmod(timestamp: DateTime<Utc>) -> String {
    timestamp.format(LASTMOD_FORMAT).to_string()
}
