//! MCP server layer
//!
//! JSON-RPC 2.0 over stdio, exposing search and scrape tools to AI
//! agents.

pub mod server;
pub mod tools;
pub mod types;

pub use server::McpServer;
pub use tools::{McpTool, ToolRegistry, AVAILABLE_TOOLS};
pub use types::{JsonRpcRequest, JsonRpcResponse, McpToolDefinition, ToolCallResult};
