use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Sumi-Sitemap
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

/// Crawl behavior configuration
///
/// Immutable for the duration of one crawl run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of link hops from the seed URL
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Whether embedded images are recorded as sitemap entries
    #[serde(rename = "include-images")]
    pub include_images: bool,

    /// Wait before each new dispatch (milliseconds)
    #[serde(rename = "request-delay")]
    pub request_delay: u64,

    /// Dispatch ceiling for one run, 0 means unlimited
    #[serde(rename = "max-pages")]
    pub max_pages: u32,
}

impl CrawlerConfig {
    /// Returns the politeness delay as a `Duration`
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            include_images: true,
            request_delay: 500,
            max_pages: 0,
        }
    }
}

/// Transport configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Timeout for page fetches (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Timeout for Last-Modified HEAD requests (seconds)
    #[serde(rename = "head-timeout")]
    pub head_timeout: u64,

    /// Maximum redirect hops followed by a fetch
    #[serde(rename = "max-redirects")]
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!(
                "sumi-sitemap/{} (+https://github.com/SiliconLion/sumi)",
                env!("CARGO_PKG_VERSION")
            ),
            request_timeout: 10,
            head_timeout: 5,
            max_redirects: 10,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the generated sitemap, `-` for stdout
    #[serde(rename = "sitemap-path")]
    pub sitemap_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sitemap_path: "sitemap.xml".to_string(),
        }
    }
}
