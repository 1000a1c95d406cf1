//! websift MCP Server
//!
//! Web search and structured page extraction over MCP stdio.

use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use websift::fetch::{FetchConfig, HttpFetcher, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use websift::mcp::{McpServer, ToolRegistry};
use websift::scrape::Scraper;
use websift::search::SearchClient;

/// websift MCP Server
#[derive(Parser, Debug)]
#[command(name = "websift")]
#[command(version)]
#[command(about = "MCP server for web search and structured page extraction")]
struct Args {
    /// Search API key (falls back to SERPER_API_KEY)
    #[arg(long, env = "SERPER_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Authentication token required on incoming MCP requests
    /// (falls back to WEBSIFT_MCP_TOKEN; empty disables auth)
    #[arg(long, env = "WEBSIFT_MCP_TOKEN", hide_env_values = true)]
    auth_token: Option<String>,

    /// Per-request fetch timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// User-Agent header for outbound requests
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("websift MCP server starting");

    let fetcher = HttpFetcher::new(FetchConfig {
        user_agent: args.user_agent,
        timeout: Duration::from_secs(args.timeout),
    })?;
    let scraper = Scraper::new(fetcher);
    let search = SearchClient::new(args.api_key);

    if !search.has_api_key() {
        tracing::warn!("No search API key configured; web_search calls will fail");
    }

    let registry = ToolRegistry::new(scraper, search);
    let server = McpServer::new(registry, args.auth_token);

    server.run().await?;

    Ok(())
}
