//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end: crawl, score, serialize, validate.

use std::io::Write;
use sumi_sitemap::config::Config;
use sumi_sitemap::sitemap::{serialize, validate};
use sumi_sitemap::{
    crawl, crawl_with_config, is_same_domain, ChangeFrequency, CrawlerConfig, Priority,
    ResourceKind, SitemapEntry, SumiError, UrlError,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Crawler settings for tests: no politeness delay
fn test_crawler_config(max_depth: u32) -> CrawlerConfig {
    CrawlerConfig {
        max_depth,
        include_images: true,
        request_delay: 0,
        max_pages: 0,
    }
}

/// Mounts an HTML page at `route`
async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(body.to_string(), "text/html"),
        )
        .mount(server)
        .await;
}

/// Fails the test if `route` is ever fetched with GET
async fn forbid_get(server: &MockServer, route: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

fn find<'a>(entries: &'a [SitemapEntry], url: &str) -> &'a SitemapEntry {
    entries
        .iter()
        .find(|entry| entry.url == url)
        .unwrap_or_else(|| panic!("{} not in sitemap", url))
}

#[tokio::test]
async fn test_depth_one_crawl_with_external_link() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        &format!(
            r#"<html><body>
            <a href="{}/about/">About</a>
            <a href="https://other.com/x">Elsewhere</a>
            </body></html>"#,
            base_url
        ),
    )
    .await;
    mount_page(&mock_server, "/about", "<html><body>About us</body></html>").await;

    let mut config = test_crawler_config(1);
    config.include_images = false;
    let entries = crawl(&format!("{}/", base_url), &config).await.unwrap();

    let urls: Vec<&str> = entries.iter().map(|e| e.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![format!("{}/", base_url), format!("{}/about", base_url)]
    );
    assert_eq!(entries[0].priority, Some(Priority::MAX));
    assert_eq!(entries[1].priority, Some(Priority::from_tenths(8)));
    assert!(!urls.iter().any(|u| u.contains("other.com")));
}

#[tokio::test]
async fn test_image_recorded_but_never_fetched() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<html><body><img src="/logo.png"></body></html>"#).await;
    forbid_get(&mock_server, "/logo.png").await;

    let entries = crawl(&format!("{}/", base_url), &test_crawler_config(1))
        .await
        .unwrap();

    let logo = find(&entries, &format!("{}/logo.png", base_url));
    assert_eq!(logo.kind, ResourceKind::Image);
    assert_eq!(logo.change_frequency, Some(ChangeFrequency::Yearly));
    assert_eq!(logo.priority, Some(Priority::from_tenths(4)));
}

#[tokio::test]
async fn test_images_skipped_when_disabled() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<img src="/logo.png"><a href="/blog/">Blog</a>"#).await;
    mount_page(&mock_server, "/blog", "<p>posts</p>").await;

    let mut config = test_crawler_config(2);
    config.include_images = false;
    let entries = crawl(&format!("{}/", base_url), &config).await.unwrap();

    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.kind == ResourceKind::Page));
    let blog = find(&entries, &format!("{}/blog", base_url));
    assert_eq!(blog.change_frequency, Some(ChangeFrequency::Daily));
}

#[tokio::test]
async fn test_depth_bound() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/a">a</a>"#).await;
    mount_page(&mock_server, "/a", r#"<a href="/a/b">b</a>"#).await;
    mount_page(&mock_server, "/a/b", r#"<a href="/a/b/c">c</a>"#).await;
    forbid_get(&mock_server, "/a/b/c").await;

    let entries = crawl(&format!("{}/", base_url), &test_crawler_config(2))
        .await
        .unwrap();

    let mut urls: Vec<String> = entries.iter().map(|e| e.url.clone()).collect();
    urls.sort();
    assert_eq!(
        urls,
        vec![
            format!("{}/", base_url),
            format!("{}/a", base_url),
            format!("{}/a/b", base_url),
        ]
    );
}

#[tokio::test]
async fn test_non_html_recorded_but_not_parsed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/files/report.pdf">Report</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/files/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"<a href="/hidden">not a link</a>"#, "application/pdf"),
        )
        .mount(&mock_server)
        .await;
    forbid_get(&mock_server, "/hidden").await;

    let entries = crawl(&format!("{}/", base_url), &test_crawler_config(3))
        .await
        .unwrap();

    let pdf = find(&entries, &format!("{}/files/report.pdf", base_url));
    assert_eq!(pdf.kind, ResourceKind::Page);
    assert_eq!(pdf.priority, Some(Priority::from_tenths(3)));
    assert_eq!(entries.len(), 2);
}

#[tokio::test]
async fn test_failed_pages_are_not_recorded() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/gone">Gone</a><a href="/here">Here</a>"#).await;
    mount_page(&mock_server, "/here", "ok").await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .expect(1)
        .mount(&mock_server)
        .await;

    let entries = crawl(&format!("{}/", base_url), &test_crawler_config(2))
        .await
        .unwrap();

    let urls: Vec<&str> = entries.iter().map(|e| e.url.as_str()).collect();
    assert!(urls.contains(&format!("{}/here", base_url).as_str()));
    assert!(!urls.iter().any(|u| u.ends_with("/gone")));
}

#[tokio::test]
async fn test_seed_failure_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let result = crawl(&format!("{}/", mock_server.uri()), &test_crawler_config(3)).await;
    match result {
        Err(SumiError::SeedUnreachable { reason, .. }) => assert_eq!(reason, "HTTP 500"),
        other => panic!("expected SeedUnreachable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_seed_rejected_before_crawling() {
    let result = crawl("ftp://example.com/", &test_crawler_config(1)).await;
    assert!(matches!(result, Err(SumiError::Url(UrlError::InvalidScheme(_)))));

    let result = crawl("https://exa mple.com/", &test_crawler_config(1)).await;
    assert!(matches!(result, Err(SumiError::Url(_))));
}

#[tokio::test]
async fn test_urls_deduplicated_across_variants() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/docs">1</a><a href="/docs/">2</a><a href="/docs#top">3</a>
           <a href="/">home</a><img src="/docs/pic.png"><img src="/docs/pic.png#x">"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/docs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"<a href="/">home</a><img src="/docs/pic.png">"#, "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let entries = crawl(&format!("{}/", base_url), &test_crawler_config(3))
        .await
        .unwrap();

    let mut urls: Vec<&str> = entries.iter().map(|e| e.url.as_str()).collect();
    let total = urls.len();
    urls.sort_unstable();
    urls.dedup();
    assert_eq!(urls.len(), total);
    assert_eq!(total, 3);
}

#[tokio::test]
async fn test_last_modified_from_head() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/news">News</a>"#).await;
    mount_page(&mock_server, "/news", "<p>today</p>").await;
    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("last-modified", "Wed, 21 Oct 2015 07:28:00 GMT"),
        )
        .mount(&mock_server)
        .await;

    let entries = crawl(&format!("{}/", base_url), &test_crawler_config(1))
        .await
        .unwrap();

    let home = find(&entries, &format!("{}/", base_url));
    assert_eq!(home.lastmod_text().as_deref(), Some("2015-10-21T07:28:00+00:00"));

    // No HEAD mock for /news: falls back to the scoring time
    let news = find(&entries, &format!("{}/news", base_url));
    assert!(news.last_modified.is_some());
    assert_ne!(news.lastmod_text(), home.lastmod_text());
}

#[tokio::test]
async fn test_entries_sorted_and_in_scope() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/x/y/z/deep">deep</a><a href="/contact">contact</a>
           <a href="/blog/post">post</a><a href="/pricing">pricing</a>
           <img src="http://127.0.0.1:9/banner.jpg">"#,
    )
    .await;
    for route in ["/x/y/z/deep", "/contact", "/blog/post", "/pricing"] {
        mount_page(&mock_server, route, "<p>leaf</p>").await;
    }

    let entries = crawl(&format!("{}/", base_url), &test_crawler_config(2))
        .await
        .unwrap();

    assert_eq!(entries.len(), 6);
    assert!(entries.windows(2).all(|w| w[0].priority >= w[1].priority));
    for entry in entries.iter().filter(|e| e.kind == ResourceKind::Page) {
        assert!(is_same_domain(&entry.url, &base_url));
    }

    // Off-domain image references are kept as written
    let banner = find(&entries, "http://127.0.0.1:9/banner.jpg");
    assert_eq!(banner.kind, ResourceKind::Image);
}

#[tokio::test]
async fn test_sitemap_round_trip_through_file() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/search?q=a&amp;page=2">Search</a><img src="/img/hero.webp">"#,
    )
    .await;
    mount_page(&mock_server, "/search", "<p>results</p>").await;

    let config = Config {
        crawler: test_crawler_config(1),
        ..Config::default()
    };
    let entries = crawl_with_config(&format!("{}/", base_url), &config)
        .await
        .unwrap();
    assert_eq!(entries.len(), 3);

    let xml = serialize(&entries).unwrap();
    assert!(xml.contains("/search?q=a&amp;page=2</loc>"));

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(xml.as_bytes()).unwrap();
    let read_back = std::fs::read_to_string(file.path()).unwrap();

    assert_eq!(validate(&read_back), Ok(entries.len()));
}
