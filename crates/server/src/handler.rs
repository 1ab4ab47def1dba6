//! MCP server handler implementation.
//!
//! Routes tool calls to the implementations in [`crate::tools`].
use std::sync::Arc;

use crate::tools::cache::{ClearContinuationsParams, clear_impl};
use crate::tools::web_fetch::{WebFetchParams, fetch_impl};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use webfetch_client::WebFetcher;

/// The main MCP server handler for mcp-webfetch.
#[derive(Clone)]
pub struct McpWebFetchServer {
    fetcher: Arc<WebFetcher>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl McpWebFetchServer {
    pub fn new(fetcher: Arc<WebFetcher>) -> Self {
        Self { fetcher, tool_router: Self::tool_router() }
    }

    /// Fetch a page as Markdown, or continue a truncated one.
    #[tool(
        description = "Fetch a web page and return its main content as Markdown with a table of contents. \
        Long pages are truncated to max_chars; pass the returned continuation_token to read the next part. \
        Use headings to keep only the sections under matching headings (1-based index or text)."
    )]
    async fn web_fetch(&self, params: Parameters<WebFetchParams>) -> Result<CallToolResult, McpError> {
        fetch_impl(&self.fetcher, params.0).await
    }

    /// Drop every pending continuation.
    #[tool(description = "Discard all pending continuation tokens. Returns how many were removed.")]
    async fn clear_continuations(
        &self, params: Parameters<ClearContinuationsParams>,
    ) -> Result<CallToolResult, McpError> {
        clear_impl(&self.fetcher, params.0).await
    }
}

impl ServerHandler for McpWebFetchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-webfetch".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::fetcher_serving;

    #[test]
    fn test_lists_both_tools() {
        let server = McpWebFetchServer::new(Arc::new(fetcher_serving("<p>x</p>")));
        let names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        assert!(names.contains(&"web_fetch".to_string()));
        assert!(names.contains(&"clear_continuations".to_string()));
    }

    #[test]
    fn test_server_info() {
        let server = McpWebFetchServer::new(Arc::new(fetcher_serving("<p>x</p>")));
        assert_eq!(server.get_info().server_info.name, "mcp-webfetch");
    }
}
