//! Page fetching
//!
//! The outbound HTTP transport behind the scraper. [`PageFetcher`] is
//! the seam the orchestrator works against; [`HttpFetcher`] is the
//! production implementation over `reqwest` with redirect following,
//! a request timeout, and a configurable user agent.

use crate::error::FetchError;
use std::future::Future;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = concat!("websift/", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// A fetched page: raw body plus the final URL after redirects
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Raw HTML body
    pub html: String,
    /// Final resolved URL (post-redirect); links resolve against this
    pub final_url: Url,
}

/// Fetches one URL and returns its body and final resolved URL.
///
/// A non-success response and a transport error are reported the same
/// way: as a [`FetchError`] the caller captures per-document.
pub trait PageFetcher: Send + Sync {
    /// Fetch a single page
    fn fetch_page(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send;
}

/// Fetcher configuration
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User-Agent header value
    pub user_agent: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// HTTP page fetcher backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the given configuration
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self { client })
    }

    /// Create a fetcher with default configuration
    pub fn with_defaults() -> Result<Self, FetchError> {
        Self::new(FetchConfig::default())
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let parsed =
            Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::InvalidUrl(format!(
                "unsupported scheme: {}",
                url
            )));
        }

        debug!("Fetching {}", parsed);

        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let final_url = response.url().clone();
        let html = response.text().await?;

        debug!("Fetched {} ({} bytes)", final_url, html.len());

        Ok(FetchedPage { html, final_url })
    }
}
