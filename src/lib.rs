//! websift - Web Search & Structured Page Extraction
//!
//! This crate provides an MCP (Model Context Protocol) server that
//! fetches web pages (individually or in batches) and a search index,
//! then reduces raw HTML into a compact, de-duplicated, user-relevant
//! representation: structured content blocks, classified links, and
//! page metadata.
//!
//! # Architecture
//!
//! ```text
//! AI Agent ──▶ MCP Server ──▶ Scraper / SearchClient
//!                                  │
//!                   (per URL) fetch ──▶ normalize ──▶ extract
//!                                  │
//!                                  ▼
//!                   Document { blocks, links, metadata }
//! ```
//!
//! Batch scraping runs one task per URL with isolated failures; the
//! batch result always matches the input order.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use websift::fetch::HttpFetcher;
//! use websift::scrape::Scraper;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scraper = Scraper::new(HttpFetcher::with_defaults()?);
//!     let doc = scraper.scrape_page("https://example.com", true).await;
//!
//!     if let Some(markdown) = doc.markdown {
//!         println!("{}", markdown);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod extraction;
pub mod fetch;
pub mod mcp;
pub mod scrape;
pub mod search;

// Re-exports for convenience
pub use error::{Error, Result};
pub use extraction::{BlockKind, ContentBlock, Link, MetaTag, StructuredDataRecord};
pub use fetch::{HttpFetcher, PageFetcher};
pub use mcp::{McpServer, ToolRegistry};
pub use scrape::{BatchResult, Document, Scraper};
pub use search::{SearchClient, SearchRequest};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
