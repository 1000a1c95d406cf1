//! MCP stdio server
//!
//! JSON-RPC 2.0 over stdin/stdout: one request per line, one response
//! per line. Supports optional token-based authentication; when a
//! token is configured, every request must carry a matching
//! `auth_token` in its params.

use crate::error::Result;
use crate::mcp::tools::ToolRegistry;
use crate::mcp::types::{
    JsonRpcRequest, JsonRpcResponse, McpCapabilities, McpServerInfo, ToolCallParams,
};
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

/// JSON-RPC error code for authentication failure (server error range)
const AUTH_ERROR_CODE: i32 = -32001;

/// MCP server state
pub struct McpServer {
    /// Tool registry
    tools: ToolRegistry,
    /// Server info
    info: McpServerInfo,
    /// Whether the server has been initialized
    initialized: RwLock<bool>,
    /// Optional authentication token; when Some, all requests must
    /// include a matching auth_token in params
    auth_token: Option<String>,
}

impl McpServer {
    /// Create a server over a tool registry.
    ///
    /// The auth token is passed in explicitly by the caller (the CLI
    /// reads it from a flag or environment variable); an empty token
    /// disables authentication.
    pub fn new(tools: ToolRegistry, auth_token: Option<String>) -> Self {
        let auth_token = auth_token.filter(|t| !t.is_empty());

        if auth_token.is_some() {
            info!("MCP server authentication enabled");
        } else {
            warn!("MCP server running without authentication");
        }

        Self {
            tools,
            info: McpServerInfo::default(),
            initialized: RwLock::new(false),
            auth_token,
        }
    }

    /// Check if authentication is enabled
    pub fn is_auth_enabled(&self) -> bool {
        self.auth_token.is_some()
    }

    /// Validate authentication for an incoming request
    fn validate_auth(&self, request: &JsonRpcRequest) -> std::result::Result<(), JsonRpcResponse> {
        let expected = match &self.auth_token {
            Some(token) => token,
            None => return Ok(()),
        };

        let provided = request
            .params
            .as_ref()
            .and_then(|p| p.get("auth_token"))
            .and_then(|v| v.as_str());

        match provided {
            Some(token) if constant_time_compare(token, expected) => {
                debug!("Authentication successful for method: {}", request.method);
                Ok(())
            }
            Some(_) => {
                warn!(method = %request.method, "Authentication failed: invalid token");
                Err(JsonRpcResponse::error(
                    request.id.clone(),
                    AUTH_ERROR_CODE,
                    "Authentication failed: invalid token",
                ))
            }
            None => {
                warn!(method = %request.method, "Authentication failed: missing auth_token");
                Err(JsonRpcResponse::error(
                    request.id.clone(),
                    AUTH_ERROR_CODE,
                    "Authentication required: missing auth_token in params",
                ))
            }
        }
    }

    /// Run the MCP server (blocking on stdin)
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<()> {
        info!("Starting MCP server: {} v{}", self.info.name, self.info.version);

        let stdin = io::stdin();
        let mut stdout = io::stdout();

        for line in stdin.lock().lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    error!("Failed to read line: {}", e);
                    continue;
                }
            };

            if line.trim().is_empty() {
                continue;
            }

            debug!("Received: {}", line);

            let response = self.handle_line(&line).await;

            if let Some(resp) = response {
                let out = serde_json::to_string(&resp).unwrap_or_else(|e| {
                    error!("Failed to serialize response: {}", e);
                    r#"{"jsonrpc":"2.0","error":{"code":-32603,"message":"Internal error"}}"#
                        .to_string()
                });

                debug!("Sending: {}", out);

                if let Err(e) = writeln!(stdout, "{}", out) {
                    error!("Failed to write response: {}", e);
                }
                if let Err(e) = stdout.flush() {
                    error!("Failed to flush stdout: {}", e);
                }
            }
        }

        info!("MCP server shutting down");
        Ok(())
    }

    /// Handle a single line of input
    async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                warn!("Failed to parse request: {}", e);
                return Some(JsonRpcResponse::parse_error());
            }
        };

        self.handle_request(request).await
    }

    /// Handle a JSON-RPC request
    #[instrument(skip(self, request))]
    async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let id = request.id.clone();
        let method = request.method.as_str();

        info!("Handling method: {}", method);

        if let Err(auth_error) = self.validate_auth(&request) {
            return Some(auth_error);
        }

        let result = match method {
            // Lifecycle methods
            "initialize" => self.handle_initialize(request.params).await,
            "initialized" => {
                // Notification, no response needed
                return None;
            }
            "shutdown" => self.handle_shutdown().await,

            // Tool methods
            "tools/list" => self.handle_tools_list().await,
            "tools/call" => return Some(self.handle_tools_call(id, request.params).await),

            // Ping (for testing)
            "ping" => Ok(json!({ "pong": true })),

            _ => {
                warn!("Unknown method: {}", method);
                return Some(JsonRpcResponse::method_not_found(id, method));
            }
        };

        Some(match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::internal_error(id, &e.to_string()),
        })
    }

    /// Handle initialize request
    async fn handle_initialize(&self, params: Option<Value>) -> Result<Value> {
        if let Some(ref p) = params {
            if let Some(version) = p.get("protocolVersion").and_then(|v| v.as_str()) {
                debug!("Client protocol version: {}", version);
            }
        }

        *self.initialized.write().await = true;

        Ok(json!({
            "protocolVersion": "2024-11-05",
            "capabilities": McpCapabilities::default(),
            "serverInfo": self.info
        }))
    }

    /// Handle shutdown request
    async fn handle_shutdown(&self) -> Result<Value> {
        *self.initialized.write().await = false;
        Ok(json!(null))
    }

    /// Handle tools/list request
    async fn handle_tools_list(&self) -> Result<Value> {
        Ok(json!({
            "tools": self.tools.definitions()
        }))
    }

    /// Handle tools/call request
    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::invalid_params(id, "missing params");
        };

        let tool_params: ToolCallParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => return JsonRpcResponse::invalid_params(id, &e.to_string()),
        };

        let result = self
            .tools
            .execute(&tool_params.name, tool_params.arguments)
            .await;

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::internal_error(id, &e.to_string()),
        }
    }
}

/// Constant-time string comparison.
///
/// Compares all bytes regardless of where the strings differ so an
/// attacker cannot recover the token byte by byte from timing.
fn constant_time_compare(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    if a_bytes.len() != b_bytes.len() {
        // Still touch every byte to keep timing independent of content
        let mut _dummy: u8 = 0;
        for byte in a_bytes.iter() {
            _dummy |= byte ^ byte;
        }
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a_bytes.iter().zip(b_bytes.iter()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::HttpFetcher;
    use crate::scrape::Scraper;
    use crate::search::SearchClient;

    fn server(auth_token: Option<&str>) -> McpServer {
        let scraper = Scraper::new(HttpFetcher::with_defaults().unwrap());
        let registry = ToolRegistry::new(scraper, SearchClient::new(None));
        McpServer::new(registry, auth_token.map(str::to_string))
    }

    fn request(method: &str, params: Option<Value>) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: Some(json!(1)),
        }
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("secret123", "secret123"));
        assert!(constant_time_compare("", ""));
        assert!(!constant_time_compare("secret123", "Secret123"));
        assert!(!constant_time_compare("short", "longer"));
    }

    #[test]
    fn test_empty_auth_token_disables_auth() {
        assert!(!server(Some("")).is_auth_enabled());
        assert!(!server(None).is_auth_enabled());
        assert!(server(Some("token")).is_auth_enabled());
    }

    #[tokio::test]
    async fn test_handle_ping() {
        let response = server(None).handle_request(request("ping", None)).await.unwrap();
        assert!(response.result.unwrap()["pong"].as_bool().unwrap());
    }

    #[tokio::test]
    async fn test_handle_initialize() {
        let response = server(None)
            .handle_request(request(
                "initialize",
                Some(json!({ "protocolVersion": "2024-11-05" })),
            ))
            .await
            .unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], "2024-11-05");
        assert_eq!(result["serverInfo"]["name"], "websift");
    }

    #[tokio::test]
    async fn test_handle_tools_list() {
        let response = server(None)
            .handle_request(request("tools/list", None))
            .await
            .unwrap();
        let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
        assert_eq!(tools.len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = server(None)
            .handle_request(request("unknown/method", None))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn test_notification_gets_no_response() {
        let mut req = request("initialized", None);
        req.id = None;
        assert!(server(None).handle_request(req).await.is_none());
    }

    #[tokio::test]
    async fn test_auth_missing_token_rejected() {
        let response = server(Some("secret"))
            .handle_request(request("ping", None))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, AUTH_ERROR_CODE);
    }

    #[tokio::test]
    async fn test_auth_wrong_token_rejected() {
        let response = server(Some("secret"))
            .handle_request(request("ping", Some(json!({ "auth_token": "wrong" }))))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, AUTH_ERROR_CODE);
    }

    #[tokio::test]
    async fn test_auth_valid_token_accepted() {
        let response = server(Some("secret"))
            .handle_request(request("ping", Some(json!({ "auth_token": "secret" }))))
            .await
            .unwrap();
        assert!(response.result.is_some());
    }

    #[tokio::test]
    async fn test_tools_call_missing_params() {
        let response = server(None)
            .handle_request(request("tools/call", None))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, -32602);
    }
}
