//! Crawler coordinator - main crawl orchestration logic
//!
//! A [`CrawlSession`] owns everything that lives for one run: the frontier and
//! visited set, the discovery set and the per-URL states. The loop dispatches
//! one URL at a time:
//! - Pop the next entry from the frontier (depth pruning, visited check)
//! - Wait the politeness delay (never before the seed)
//! - Fetch it and record the outcome
//! - Parse HTML pages, record images and push same-domain links

use crate::config::{Config, CrawlerConfig};
use crate::crawler::extractor::parse_html;
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchResult};
use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::sitemap::{score_all, SitemapEntry};
use crate::state::{DiscoveredUrl, DiscoverySet, PageState, ResourceKind};
use crate::url::{base_domain, is_same_domain, normalize_parsed, parse_seed_url};
use crate::{SumiError, UrlError};
use reqwest::Client;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use url::Url;

/// Counters collected during a crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlStats {
    /// URLs taken from the frontier and fetched
    pub dispatched: usize,
    /// 200 responses with an HTML body
    pub html_pages: usize,
    /// 200 responses with any other content type
    pub other_pages: usize,
    /// Transport errors and non-200 responses
    pub failed: usize,
    /// Image URLs recorded
    pub images: usize,
    pub elapsed: Duration,
}

/// Result of a completed crawl, before scoring
#[derive(Debug)]
pub struct CrawlReport {
    /// Normalized seed URL
    pub seed_url: String,
    /// Recorded URLs in discovery order
    pub discovered: Vec<DiscoveredUrl>,
    pub stats: CrawlStats,
}

/// State of a single crawl run
pub struct CrawlSession {
    config: CrawlerConfig,
    client: Client,
    seed_url: String,
    base_domain: String,
    frontier: Frontier,
    discovered: DiscoverySet,
    states: HashMap<String, PageState>,
    stats: CrawlStats,
}

impl CrawlSession {
    /// Creates a session that sends requests through `client`
    pub fn with_client(
        seed: Url,
        config: CrawlerConfig,
        client: Client,
    ) -> Result<Self, SumiError> {
        let seed = normalize_parsed(seed);
        let base_domain = base_domain(&seed).ok_or(UrlError::MissingDomain)?;
        let seed_url = seed.to_string();
        let frontier = Frontier::new(&seed_url, config.max_depth);

        Ok(Self {
            config,
            client,
            seed_url,
            base_domain,
            frontier,
            discovered: DiscoverySet::new(),
            states: HashMap::new(),
            stats: CrawlStats::default(),
        })
    }

    /// Normalized seed URL
    pub fn seed_url(&self) -> &str {
        &self.seed_url
    }

    /// `scheme://host[:port]` every crawled page shares
    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    /// Current state of a URL; anything never dispatched is `Unvisited`
    pub fn page_state(&self, url: &str) -> PageState {
        self.states.get(url).copied().unwrap_or(PageState::Unvisited)
    }

    /// Runs the crawl to completion
    ///
    /// Fails only when the seed itself cannot be fetched. Every other failure
    /// is logged and the crawl continues.
    pub async fn run(mut self) -> Result<CrawlReport, SumiError> {
        tracing::info!(
            "Starting crawl of {} (max depth {}, images {})",
            self.seed_url,
            self.config.max_depth,
            if self.config.include_images { "on" } else { "off" }
        );

        let start_time = Instant::now();
        let delay = self.config.request_delay();

        loop {
            if self.config.max_pages > 0 && self.stats.dispatched >= self.config.max_pages as usize
            {
                tracing::info!(
                    "Reached max-pages ceiling of {}, {} entries left in frontier",
                    self.config.max_pages,
                    self.frontier.pending()
                );
                break;
            }

            let entry = match self.frontier.next_dispatch() {
                Some(entry) => entry,
                None => {
                    tracing::debug!("Frontier is empty, crawl complete");
                    break;
                }
            };

            if self.stats.dispatched > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            self.stats.dispatched += 1;

            if let Err(reason) = self.process_url(&entry).await {
                if entry.depth == 0 {
                    return Err(SumiError::SeedUnreachable {
                        url: entry.url,
                        reason,
                    });
                }
                tracing::warn!("Failed to fetch {}: {}", entry.url, reason);
            }
        }

        self.stats.images = self.discovered.count(ResourceKind::Image);
        self.stats.elapsed = start_time.elapsed();

        tracing::info!(
            "Crawl completed in {:?}: {} pages, {} images, {} failed, {} dispatched",
            self.stats.elapsed,
            self.discovered.count(ResourceKind::Page),
            self.stats.images,
            self.stats.failed,
            self.stats.dispatched
        );

        Ok(CrawlReport {
            seed_url: self.seed_url,
            discovered: self.discovered.into_vec(),
            stats: self.stats,
        })
    }

    /// Fetches one dispatched URL and applies the outcome
    ///
    /// Returns the terminal state, or the failure reason for `Failed`.
    async fn process_url(&mut self, entry: &FrontierEntry) -> Result<PageState, String> {
        tracing::debug!("Dispatching {} at depth {}", entry.url, entry.depth);
        self.transition(&entry.url, PageState::Dispatched);

        let result = fetch_url(&self.client, &entry.url).await;
        let state = result.page_state();
        self.transition(&entry.url, state);

        if !state.is_recorded() {
            self.stats.failed += 1;
            return Err(result.failure_reason().unwrap_or_default());
        }
        self.discovered.record_page(&entry.url);

        match result {
            FetchResult::Html { final_url, body } if state.is_traversable() => {
                self.stats.html_pages += 1;
                if final_url != entry.url {
                    tracing::debug!("{} redirected to {}", entry.url, final_url);
                }
                self.follow_page(entry, &body);
            }
            FetchResult::Other { content_type } => {
                self.stats.other_pages += 1;
                tracing::debug!("Recorded {} ({}) without parsing", entry.url, content_type);
            }
            _ => {}
        }

        Ok(state)
    }

    /// Extracts a fetched page and feeds the results back into the run
    fn follow_page(&mut self, entry: &FrontierEntry, body: &str) {
        let page_url = match Url::parse(&entry.url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Cannot extract from {}: {}", entry.url, e);
                return;
            }
        };

        let parsed = parse_html(body, &page_url, self.config.include_images);

        for image in &parsed.images {
            self.discovered.record_image(image);
        }

        let children: Vec<String> = parsed
            .links
            .into_iter()
            .filter(|link| is_same_domain(link, &self.base_domain))
            .filter(|link| !self.frontier.is_visited(link))
            .collect();

        tracing::debug!(
            "{}: {} new links, {} images",
            entry.url,
            children.len(),
            parsed.images.len()
        );
        self.frontier.push_children(&children, entry.depth);
    }

    fn transition(&mut self, url: &str, next: PageState) {
        let current = self.page_state(url);
        debug_assert!(
            current.can_transition_to(next),
            "invalid transition {} -> {} for {}",
            current,
            next,
            url
        );
        self.states.insert(url.to_string(), next);
    }
}

/// Crawls a site and returns its scored sitemap entries
///
/// Uses the default transport settings. See [`crawl_with_config`].
///
/// # Example
///
/// ```no_run
/// use sumi_sitemap::{crawl, CrawlerConfig};
///
/// # async fn example() -> Result<(), sumi_sitemap::SumiError> {
/// let entries = crawl("https://example.com/", &CrawlerConfig::default()).await?;
/// println!("{} entries", entries.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(seed_url: &str, config: &CrawlerConfig) -> Result<Vec<SitemapEntry>, SumiError> {
    let config = Config {
        crawler: config.clone(),
        ..Config::default()
    };
    crawl_with_config(seed_url, &config).await
}

/// Crawls a site with full configuration and scores the result
///
/// This function:
///
/// 1. Validates the seed URL (no request is made for an invalid seed)
/// 2. Builds the HTTP client
/// 3. Runs a [`CrawlSession`]
/// 4. Scores every discovered URL, reusing the same client for HEAD requests
///
/// Entries are returned by descending priority, ties in discovery order.
///
/// # Returns
///
/// * `Ok(Vec<SitemapEntry>)` - Scored entries, never empty
/// * `Err(SumiError::Url)` - The seed URL is invalid
/// * `Err(SumiError::SeedUnreachable)` - The seed URL could not be fetched
pub async fn crawl_with_config(
    seed_url: &str,
    config: &Config,
) -> Result<Vec<SitemapEntry>, SumiError> {
    let seed = parse_seed_url(seed_url)?;
    let client = build_http_client(&config.http)?;

    let session = CrawlSession::with_client(seed, config.crawler.clone(), client.clone())?;
    let report = session.run().await?;

    let head_timeout = Duration::from_secs(config.http.head_timeout);
    Ok(score_all(&client, &report.discovered, &report.seed_url, head_timeout).await)
}
