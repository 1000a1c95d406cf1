//! Search index client
//!
//! A thin request/response pass-through to a Serper-style search API.
//! The API key is passed in explicitly at construction; the result is
//! returned as opaque JSON, exactly as the index provided it.

use crate::error::SearchError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

/// Default search API endpoint
pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://google.serper.dev/search";

/// A search request.
///
/// Optional fields are omitted from the outgoing payload when unset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Search query string
    pub q: String,
    /// Region code in ISO 3166-1 alpha-2 format (e.g. "us")
    pub gl: String,
    /// Language code in ISO 639-1 format (e.g. "en")
    pub hl: String,
    /// Number of results to return
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num: Option<u32>,
    /// Page number of results to return
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Time-based search filter (e.g. "qdr:h", "qdr:d", "qdr:w")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tbs: Option<String>,
    /// Location bias (e.g. "California, United States")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Whether to autocorrect spelling in the query
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autocorrect: Option<bool>,
}

/// Client for the search index
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
}

impl SearchClient {
    /// Create a client with an optional API key.
    ///
    /// A client without a key can be constructed (the serving layer may
    /// run scrape-only), but search calls will fail with
    /// [`SearchError::MissingApiKey`].
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_endpoint(api_key, DEFAULT_SEARCH_ENDPOINT)
    }

    /// Create a client against a specific endpoint (used in tests)
    pub fn with_endpoint(api_key: Option<String>, endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.filter(|k| !k.is_empty()),
            endpoint: endpoint.into(),
        }
    }

    /// Whether search is available (an API key is configured)
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Perform a search, returning the index's result verbatim
    #[instrument(skip(self, request), fields(q = %request.q))]
    pub async fn search(&self, request: &SearchRequest) -> Result<Value, SearchError> {
        let api_key = self.api_key.as_ref().ok_or(SearchError::MissingApiKey)?;

        debug!("Searching via {}", self.endpoint);

        let response = self
            .http
            .post(&self.endpoint)
            .header("X-API-KEY", api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }

        response
            .json()
            .await
            .map_err(|e| SearchError::RequestFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(q: &str) -> SearchRequest {
        SearchRequest {
            q: q.to_string(),
            gl: "us".to_string(),
            hl: "en".to_string(),
            num: None,
            page: None,
            tbs: None,
            location: None,
            autocorrect: None,
        }
    }

    #[test]
    fn test_unset_fields_are_omitted_from_payload() {
        let json = serde_json::to_value(request("rust")).unwrap();
        assert_eq!(json["q"], "rust");
        assert!(json.get("num").is_none());
        assert!(json.get("tbs").is_none());
    }

    #[test]
    fn test_set_fields_are_serialized() {
        let mut req = request("rust");
        req.num = Some(20);
        req.autocorrect = Some(false);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["num"], 20);
        assert_eq!(json["autocorrect"], false);
    }

    #[test]
    fn test_empty_api_key_counts_as_missing() {
        let client = SearchClient::new(Some(String::new()));
        assert!(!client.has_api_key());
    }

    #[tokio::test]
    async fn test_search_without_key_fails() {
        let client = SearchClient::new(None);
        let err = client.search(&request("rust")).await.unwrap_err();
        assert!(matches!(err, SearchError::MissingApiKey));
    }
}
