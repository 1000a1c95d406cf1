//! Scrape orchestration
//!
//! Applies the extraction pipeline to one URL or to a batch of URLs.
//! Batch scraping runs one task per URL; a URL's fetch or parse
//! failure only populates that URL's [`Document::error`] and never
//! aborts its siblings. The batch result is always in input order,
//! regardless of completion order.

use crate::extraction::{self, to_markdown, ContentBlock, Link, MetaTag, StructuredDataRecord};
use crate::fetch::{HttpFetcher, PageFetcher};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// The structured extraction result for one fetched URL.
///
/// Exactly one of {populated content fields, `error`} is meaningfully
/// set: a failed fetch yields a document carrying only URL, timestamp,
/// and error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// The requested URL
    pub url: String,
    /// Fetch timestamp (UTC)
    pub timestamp: DateTime<Utc>,
    /// Page title, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Deduplicated content blocks in document order
    pub content: Vec<ContentBlock>,
    /// Classified links, deduplicated by resolved URL
    pub links: Vec<Link>,
    /// Meta description, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// All meta tags in document order
    pub meta_tags: Vec<MetaTag>,
    /// JSON-LD payloads in document order
    pub structured_data: Vec<StructuredDataRecord>,
    /// Markdown rendering of the content blocks, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    /// Fetch or parse failure for this URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Document {
    /// A document representing a failed fetch or parse
    fn failed(url: &str, timestamp: DateTime<Utc>, error: String) -> Self {
        Self {
            url: url.to_string(),
            timestamp,
            title: None,
            content: Vec::new(),
            links: Vec::new(),
            description: None,
            meta_tags: Vec::new(),
            structured_data: Vec::new(),
            markdown: None,
            error: Some(error),
        }
    }

    /// Whether this document represents a successful extraction
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// The ordered collection of documents for a multi-URL request.
///
/// Positionally matches the requested URL list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchResult {
    /// One document per requested URL, in request order
    pub documents: Vec<Document>,
}

/// Scrape orchestrator over a page fetcher
#[derive(Debug, Clone)]
pub struct Scraper<F = HttpFetcher> {
    fetcher: F,
}

impl<F: PageFetcher + Clone + 'static> Scraper<F> {
    /// Create a scraper over the given fetcher
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Scrape a single URL.
    ///
    /// Never fails outward: fetch and parse failures land in the
    /// returned document's `error` field.
    #[instrument(skip(self))]
    pub async fn scrape_page(&self, url: &str, include_markdown: bool) -> Document {
        let timestamp = Utc::now();

        let page = match self.fetcher.fetch_page(url).await {
            Ok(page) => page,
            Err(e) => {
                warn!("Fetch failed for {}: {}", url, e);
                return Document::failed(url, timestamp, e.to_string());
            }
        };

        let extracted = match extraction::extract_page(&page.html, &page.final_url) {
            Ok(extracted) => extracted,
            Err(e) => {
                warn!("Extraction failed for {}: {}", url, e);
                return Document::failed(url, timestamp, e.to_string());
            }
        };

        let markdown = include_markdown.then(|| to_markdown(&extracted.blocks));

        info!(
            "Scraped {}: {} blocks, {} links",
            url,
            extracted.blocks.len(),
            extracted.links.len()
        );

        Document {
            url: url.to_string(),
            timestamp,
            title: extracted.metadata.title,
            content: extracted.blocks,
            links: extracted.links,
            description: extracted.metadata.description,
            meta_tags: extracted.metadata.meta_tags,
            structured_data: extracted.metadata.structured_data,
            markdown,
            error: None,
        }
    }

    /// Scrape many URLs concurrently.
    ///
    /// One task per URL; task handles are kept in input order and
    /// joined in that order, so completion order is never observable
    /// in the result. An empty URL list yields an empty batch.
    #[instrument(skip(self, urls), fields(count = urls.len()))]
    pub async fn scrape_batch(&self, urls: &[String], include_markdown: bool) -> BatchResult {
        let handles: Vec<_> = urls
            .iter()
            .map(|url| {
                let scraper = self.clone();
                let url = url.clone();
                tokio::spawn(async move { scraper.scrape_page(&url, include_markdown).await })
            })
            .collect();

        let mut documents = Vec::with_capacity(urls.len());
        for (url, joined) in urls.iter().zip(join_all(handles).await) {
            documents.push(match joined {
                Ok(doc) => doc,
                // A panicking task is that URL's failure, not the batch's
                Err(e) => Document::failed(url, Utc::now(), format!("task failed: {}", e)),
            });
        }

        BatchResult { documents }
    }
}
