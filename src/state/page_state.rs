/// Page state definitions for tracking crawl progress
///
/// Each normalized URL moves through `Unvisited → Dispatched → {FetchedHtml,
/// FetchedOther, Failed}` exactly once per crawl run.
use std::fmt;

/// Represents the current state of a URL in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    // ===== Active States =====
    /// URL has been seen as a candidate but not dispatched
    Unvisited,

    /// URL is in the visited set and its fetch has been issued
    Dispatched,

    // ===== Terminal States =====
    /// 200 response with an HTML body; the only state that leads to extraction
    FetchedHtml,

    /// 200 response with any other content type; recorded but not parsed
    FetchedOther,

    /// Transport error or non-200 status; not recorded
    Failed,
}

impl PageState {
    /// Returns true if this is a terminal state (no further processing needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::FetchedHtml | Self::FetchedOther | Self::Failed)
    }

    /// Returns true if the URL belongs in the sitemap
    pub fn is_recorded(&self) -> bool {
        matches!(self, Self::FetchedHtml | Self::FetchedOther)
    }

    /// Returns true if links should be extracted from the response
    pub fn is_traversable(&self) -> bool {
        matches!(self, Self::FetchedHtml)
    }

    /// Checks whether moving from this state to `next` is allowed
    pub fn can_transition_to(&self, next: PageState) -> bool {
        match (self, next) {
            (Self::Unvisited, Self::Dispatched) => true,
            (Self::Dispatched, next) => next.is_terminal(),
            _ => false,
        }
    }

    /// Returns the lowercase name used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unvisited => "unvisited",
            Self::Dispatched => "dispatched",
            Self::FetchedHtml => "fetched_html",
            Self::FetchedOther => "fetched_other",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
