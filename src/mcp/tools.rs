//! MCP tool definitions and registry
//!
//! Defines the search and scrape tools and dispatches tool calls to
//! the scraper and search clients.

use crate::fetch::HttpFetcher;
use crate::mcp::types::{McpToolDefinition, ToolCallResult};
use crate::scrape::Scraper;
use crate::search::{SearchClient, SearchRequest};
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::{info, instrument};

/// A registered MCP tool
pub trait McpTool: Send + Sync {
    /// Tool name
    fn name(&self) -> &str;
    /// Tool description
    fn description(&self) -> &str;
    /// Input schema as JSON
    fn input_schema(&self) -> Value;
    /// Get tool definition
    fn definition(&self) -> McpToolDefinition {
        McpToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

/// Tool registry holding the tools and the clients they dispatch to
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn McpTool>>,
    scraper: Scraper<HttpFetcher>,
    search: SearchClient,
}

impl ToolRegistry {
    /// Create a registry with all built-in tools
    pub fn new(scraper: Scraper<HttpFetcher>, search: SearchClient) -> Self {
        let mut registry = Self {
            tools: HashMap::new(),
            scraper,
            search,
        };

        registry.register(Box::new(WebSearchTool));
        registry.register(Box::new(ScrapePageTool));
        registry.register(Box::new(ScrapeBatchTool));

        registry
    }

    /// Register a tool
    pub fn register(&mut self, tool: Box<dyn McpTool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get all tool definitions
    pub fn definitions(&self) -> Vec<McpToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    /// Execute a tool by name
    #[instrument(skip(self, args))]
    pub async fn execute(&self, name: &str, args: Value) -> ToolCallResult {
        info!("Executing tool: {}", name);

        match name {
            "web_search" => self.execute_search(args).await,
            "scrape_page" => self.execute_scrape_page(args).await,
            "scrape_batch" => self.execute_scrape_batch(args).await,
            _ => ToolCallResult::error(format!("Tool not found: {}", name)),
        }
    }

    async fn execute_search(&self, args: Value) -> ToolCallResult {
        let request: SearchRequest = match serde_json::from_value(args) {
            Ok(r) => r,
            Err(e) => return ToolCallResult::error(format!("Invalid search arguments: {}", e)),
        };

        match self.search.search(&request).await {
            Ok(results) => ToolCallResult::json(&results),
            Err(e) => ToolCallResult::error(format!("Search failed: {}", e)),
        }
    }

    async fn execute_scrape_page(&self, args: Value) -> ToolCallResult {
        let url = match args.get("url").and_then(|v| v.as_str()) {
            Some(u) => u,
            None => return ToolCallResult::error("Missing required parameter: url"),
        };
        let include_markdown = args
            .get("includeMarkdown")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        let document = self.scraper.scrape_page(url, include_markdown).await;
        ToolCallResult::json(&document)
    }

    async fn execute_scrape_batch(&self, args: Value) -> ToolCallResult {
        let urls = match args.get("urls").and_then(|v| v.as_array()) {
            Some(arr) => arr,
            None => return ToolCallResult::error("Missing required parameter: urls"),
        };
        let urls: Vec<String> = match urls
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
        {
            Some(urls) => urls,
            None => return ToolCallResult::error("Parameter urls must be an array of strings"),
        };
        let include_markdown = args
            .get("includeMarkdown")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        let batch = self.scraper.scrape_batch(&urls, include_markdown).await;
        ToolCallResult::json(&batch)
    }
}

// ============================================================================
// Tool Definitions
// ============================================================================

/// Search the web via the configured search index
struct WebSearchTool;

impl McpTool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Perform a web search and return the raw search index results"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "q": {
                    "type": "string",
                    "description": "Search query string"
                },
                "gl": {
                    "type": "string",
                    "description": "Region code, ISO 3166-1 alpha-2 (e.g. 'us')"
                },
                "hl": {
                    "type": "string",
                    "description": "Language code, ISO 639-1 (e.g. 'en')"
                },
                "num": {
                    "type": "integer",
                    "description": "Number of results to return (default: 10)"
                },
                "page": {
                    "type": "integer",
                    "description": "Page number of results to return (default: 1)"
                },
                "tbs": {
                    "type": "string",
                    "description": "Time filter: 'qdr:h', 'qdr:d', 'qdr:w', 'qdr:m', or 'qdr:y'"
                },
                "location": {
                    "type": "string",
                    "description": "Location bias for results (e.g. 'California, United States')"
                },
                "autocorrect": {
                    "type": "boolean",
                    "description": "Whether to autocorrect spelling in the query"
                }
            },
            "required": ["q", "gl", "hl"]
        })
    }
}

/// Scrape one page into a structured document
struct ScrapePageTool;

impl McpTool for ScrapePageTool {
    fn name(&self) -> &str {
        "scrape_page"
    }

    fn description(&self) -> &str {
        "Fetch a URL and extract structured content blocks, links, and metadata"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The URL of the webpage to scrape"
                },
                "includeMarkdown": {
                    "type": "boolean",
                    "description": "Whether to include a markdown rendering of the content",
                    "default": false
                }
            },
            "required": ["url"]
        })
    }
}

/// Scrape many pages concurrently
struct ScrapeBatchTool;

impl McpTool for ScrapeBatchTool {
    fn name(&self) -> &str {
        "scrape_batch"
    }

    fn description(&self) -> &str {
        "Scrape multiple URLs concurrently; results are returned in request order \
         and a failed URL never aborts the others"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "urls": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "List of URLs to scrape in parallel"
                },
                "includeMarkdown": {
                    "type": "boolean",
                    "description": "Whether to include a markdown rendering of the content",
                    "default": false
                }
            },
            "required": ["urls"]
        })
    }
}

/// List of all available tools (for documentation)
pub const AVAILABLE_TOOLS: &[&str] = &["web_search", "scrape_page", "scrape_batch"];
