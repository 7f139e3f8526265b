//! State module for tracking crawl progress
//!
//! This module provides the run-scoped state of one crawl.
//!
//! # Components
//!
//! - `PageState`: Tracks the state of individual URLs (dispatched, fetched, failed)
//! - `DiscoverySet`: Deduplicated, discovery-ordered record of sitemap URLs
//! - `DiscoveredUrl` / `ResourceKind`: One recorded URL and whether it is a page or an image

mod discovered;
mod page_state;

// Re-export main types
pub use discovered::{DiscoveredUrl, DiscoverySet, ResourceKind};
pub use page_state::PageState;
