//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeouts
//! - GET requests that follow redirects and classify the response
//! - HEAD requests used to read `Last-Modified` headers

use crate::config::HttpConfig;
use crate::state::PageState;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::header::{CONTENT_TYPE, LAST_MODIFIED};
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// 200 response with an HTML body
    Html {
        /// Final URL after redirects
        final_url: String,
        /// Page body content
        body: String,
    },

    /// 200 response that is not HTML (PDF, stylesheet, ...)
    Other {
        /// The Content-Type received
        content_type: String,
    },

    /// Any status other than 200
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, DNS, TLS, ...)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Maps the fetch outcome onto the terminal page state
    pub fn page_state(&self) -> PageState {
        match self {
            Self::Html { .. } => PageState::FetchedHtml,
            Self::Other { .. } => PageState::FetchedOther,
            Self::HttpError { .. } | Self::NetworkError { .. } => PageState::Failed,
        }
    }

    /// Describes why a fetch failed, if it did
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            Self::HttpError { status_code } => Some(format!("HTTP {}", status_code)),
            Self::NetworkError { error } => Some(error.clone()),
            _ => None,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The transport configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sumi_sitemap::config::HttpConfig;
/// use sumi_sitemap::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout))
        .connect_timeout(Duration::from_secs(config.request_timeout.min(10)))
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with GET and classifies the response
///
/// | Condition | Result |
/// |-----------|--------|
/// | Transport error | `NetworkError` |
/// | Status other than 200 | `HttpError` |
/// | 200 with `text/html` | `Html` |
/// | 200 with anything else | `Other` |
///
/// An HTML response whose body cannot be read is reported as `Other`: the URL
/// exists and is listed, but nothing can be extracted from it.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else if e.is_redirect() {
                format!("Redirect error: {}", e)
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    if status != StatusCode::OK {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_lowercase();

    if !content_type.contains("text/html") {
        return FetchResult::Other { content_type };
    }

    match response.text().await {
        Ok(body) => FetchResult::Html { final_url, body },
        Err(e) => {
            tracing::warn!("Failed to read body of {}: {}", url, e);
            FetchResult::Other { content_type }
        }
    }
}

/// Sends a HEAD request and parses its `Last-Modified` header
///
/// Best effort: any transport failure, missing header or unparseable date
/// yields `None`.
pub async fn fetch_last_modified(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Option<DateTime<Utc>> {
    let response = match client.head(url).timeout(timeout).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("HEAD request for {} failed: {}", url, e);
            return None;
        }
    };

    let header = response.headers().get(LAST_MODIFIED)?.to_str().ok()?;
    let parsed = parse_http_date(header);
    if parsed.is_none() {
        tracing::debug!("Unparseable Last-Modified for {}: {}", url, header);
    }
    parsed
}

/// Parses an HTTP-date (IMF-fixdate, RFC 850 or asctime) into UTC
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }

    // Obsolete forms still produced by some servers
    ["%A, %d-%b-%y %H:%M:%S GMT", "%a %b %e %H:%M:%S %Y"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}
