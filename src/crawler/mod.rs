//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching (GET for pages, HEAD for `Last-Modified`)
//! - HTML parsing with link and image extraction
//! - The depth-first frontier and visited set
//! - Overall crawl coordination

mod coordinator;
mod extractor;
mod fetcher;
mod frontier;

pub use coordinator::{crawl, crawl_with_config, CrawlReport, CrawlSession, CrawlStats};
pub use extractor::{extract_images, extract_links, parse_html, ParsedPage};
pub use fetcher::{
    build_http_client, fetch_last_modified, fetch_url, parse_http_date, FetchResult,
};
pub use frontier::{Frontier, FrontierEntry};
