//! Error types for websift
//!
//! This module provides the error type hierarchy using `thiserror`
//! for proper error handling across all components.

use thiserror::Error;

/// The main error type for websift operations
#[derive(Error, Debug)]
pub enum Error {
    /// Page fetching errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Content extraction errors
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Search API errors
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// MCP protocol errors
    #[error("MCP error: {0}")]
    Mcp(#[from] McpError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// Page fetch errors (URL, transport, status)
#[derive(Error, Debug)]
pub enum FetchError {
    /// The URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Transport-level failure (DNS, connect, TLS, read)
    #[error("Network error: {0}")]
    Network(String),

    /// Request timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Non-success HTTP status
    #[error("HTTP status {status} for {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// The URL that returned the status
        url: String,
    },
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "<unknown>".to_string());
        if err.is_timeout() {
            FetchError::Timeout(url)
        } else if let Some(status) = err.status() {
            FetchError::Status {
                status: status.as_u16(),
                url,
            }
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

/// Content extraction errors
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// HTML could not be parsed even leniently
    #[error("Unparseable HTML: {0}")]
    Unparseable(String),

    /// Base URL required for link resolution is invalid
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Search API errors
#[derive(Error, Debug)]
pub enum SearchError {
    /// No API key was configured
    #[error("Search API key is required for search operations")]
    MissingApiKey,

    /// Request-level failure
    #[error("Search request failed: {0}")]
    RequestFailed(String),

    /// Non-success HTTP status from the search API
    #[error("Search API returned status {0}")]
    Status(u16),
}

/// MCP protocol errors
#[derive(Error, Debug)]
pub enum McpError {
    /// Invalid JSON-RPC request
    #[error("Invalid JSON-RPC request: {0}")]
    InvalidRequest(String),

    /// Invalid parameters
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// Tool not found
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Tool execution failed
    #[error("Tool execution failed: {0}")]
    ToolExecutionFailed(String),
}

/// Result type alias for websift operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a generic error from a string
    pub fn generic<S: Into<String>>(msg: S) -> Self {
        Error::Generic(msg.into())
    }
}
