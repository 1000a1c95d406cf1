//! Scrape orchestration tests
//!
//! Batch ordering and isolation guarantees, plus the HTTP fetcher path
//! against a local mock server.

use std::collections::HashMap;
use std::time::Duration;
use url::Url;
use websift::error::FetchError;
use websift::fetch::{FetchConfig, FetchedPage, HttpFetcher, PageFetcher};
use websift::scrape::Scraper;

/// Test fetcher serving canned pages with per-URL delays, so that
/// completion order differs from request order.
#[derive(Clone, Default)]
struct CannedFetcher {
    pages: HashMap<String, (Duration, Result<String, String>)>,
}

impl CannedFetcher {
    fn page(mut self, url: &str, delay_ms: u64, html: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            (Duration::from_millis(delay_ms), Ok(html.to_string())),
        );
        self
    }

    fn failure(mut self, url: &str, delay_ms: u64, error: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            (Duration::from_millis(delay_ms), Err(error.to_string())),
        );
        self
    }
}

impl PageFetcher for CannedFetcher {
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let (delay, outcome) = self
            .pages
            .get(url)
            .cloned()
            .unwrap_or_else(|| (Duration::ZERO, Err("unknown url".to_string())));

        tokio::time::sleep(delay).await;

        match outcome {
            Ok(html) => Ok(FetchedPage {
                html,
                final_url: Url::parse(url)
                    .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?,
            }),
            Err(msg) => Err(FetchError::Network(msg)),
        }
    }
}

#[tokio::test]
async fn test_batch_order_matches_input_despite_completion_order() {
    // A finishes last, C finishes first
    let fetcher = CannedFetcher::default()
        .page("https://a.example/", 80, "<p>doc a</p>")
        .page("https://b.example/", 40, "<p>doc b</p>")
        .page("https://c.example/", 0, "<p>doc c</p>");

    let urls: Vec<String> = ["https://a.example/", "https://b.example/", "https://c.example/"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let batch = Scraper::new(fetcher).scrape_batch(&urls, false).await;

    let out: Vec<&str> = batch.documents.iter().map(|d| d.url.as_str()).collect();
    assert_eq!(out, urls.iter().map(String::as_str).collect::<Vec<_>>());
    assert_eq!(batch.documents[0].content[0].text, "doc a");
    assert_eq!(batch.documents[2].content[0].text, "doc c");
}

#[tokio::test]
async fn test_one_failure_never_aborts_the_batch() {
    let fetcher = CannedFetcher::default()
        .page("https://good1.example/", 0, "<h1>One</h1>")
        .failure("https://bad.example/", 10, "connection refused")
        .page("https://good2.example/", 0, "<h1>Two</h1>");

    let urls: Vec<String> = [
        "https://good1.example/",
        "https://bad.example/",
        "https://good2.example/",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    let batch = Scraper::new(fetcher).scrape_batch(&urls, false).await;

    assert_eq!(batch.documents.len(), 3);

    let bad = &batch.documents[1];
    assert!(bad.error.as_deref().unwrap().contains("connection refused"));
    assert!(bad.content.is_empty());
    assert!(bad.links.is_empty());

    for doc in [&batch.documents[0], &batch.documents[2]] {
        assert!(doc.is_ok());
        assert_eq!(doc.content.len(), 1);
    }
}

#[tokio::test]
async fn test_empty_url_list_yields_empty_batch() {
    let batch = Scraper::new(CannedFetcher::default())
        .scrape_batch(&[], false)
        .await;
    assert!(batch.documents.is_empty());
}

#[tokio::test]
async fn test_markdown_flag_applies_to_every_document() {
    let fetcher = CannedFetcher::default()
        .page("https://a.example/", 0, "<h1>A</h1>")
        .page("https://b.example/", 0, "<h1>B</h1>");

    let urls: Vec<String> = ["https://a.example/", "https://b.example/"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let batch = Scraper::new(fetcher.clone()).scrape_batch(&urls, true).await;
    assert!(batch.documents.iter().all(|d| d.markdown.is_some()));
    assert_eq!(batch.documents[0].markdown.as_deref(), Some("# A"));

    let batch = Scraper::new(fetcher).scrape_batch(&urls, false).await;
    assert!(batch.documents.iter().all(|d| d.markdown.is_none()));
}

#[tokio::test]
async fn test_http_fetcher_success() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/page")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<title>Mock</title><p>Hello from mock.</p>")
        .create_async()
        .await;

    let fetcher = HttpFetcher::new(FetchConfig::default()).unwrap();
    let url = format!("{}/page", server.url());
    let doc = Scraper::new(fetcher).scrape_page(&url, false).await;

    assert!(doc.is_ok());
    assert_eq!(doc.title.as_deref(), Some("Mock"));
    assert_eq!(doc.content.len(), 1);
    assert_eq!(doc.content[0].text, "Hello from mock.");
}

#[tokio::test]
async fn test_http_fetcher_status_error_lands_in_document() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/missing")
        .with_status(404)
        .create_async()
        .await;

    let fetcher = HttpFetcher::new(FetchConfig::default()).unwrap();
    let url = format!("{}/missing", server.url());
    let doc = Scraper::new(fetcher).scrape_page(&url, false).await;

    assert!(!doc.is_ok());
    assert!(doc.error.as_deref().unwrap().contains("404"));
    assert!(doc.content.is_empty());
}

#[tokio::test]
async fn test_http_fetcher_links_resolve_against_final_url() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/dir/page")
        .with_status(200)
        .with_body(r#"<a href="sibling">S</a><a href="https://other.com/">O</a>"#)
        .create_async()
        .await;

    let fetcher = HttpFetcher::new(FetchConfig::default()).unwrap();
    let url = format!("{}/dir/page", server.url());
    let doc = Scraper::new(fetcher).scrape_page(&url, false).await;

    assert!(doc.is_ok());
    assert_eq!(doc.links.len(), 2);
    assert_eq!(doc.links[0].url, format!("{}/dir/sibling", server.url()));
    assert!(!doc.links[0].external);
    assert!(doc.links[1].external);
}
