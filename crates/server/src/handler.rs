//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::{SitesDataParams, sites_data_impl};
use sitesnap_core::{AppConfig, Resolver};

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

/// The main MCP server handler for sitesnap.
#[derive(Clone)]
pub struct SitesnapServer {
    tool_router: ToolRouter<Self>,
    resolver: Arc<Resolver>,
    config: Arc<AppConfig>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl SitesnapServer {
    /// Create a new server handler.
    pub fn new(resolver: Resolver, config: AppConfig) -> Self {
        Self { tool_router: Self::tool_router(), resolver: Arc::new(resolver), config: Arc::new(config) }
    }

    /// Resolve a batch of URLs to their content.
    ///
    /// Content fetched within the recency window is served from the cache;
    /// everything else is fetched in parallel and cached for later calls.
    #[tool(
        description = "Get the content of a batch of URLs. Returns a JSON array of {url, data} in input order. \
                       Recently fetched URLs are served from cache; any failed fetch fails the whole batch."
    )]
    async fn sites_data(&self, params: Parameters<SitesDataParams>) -> Result<CallToolResult, McpError> {
        sites_data_impl(&self.resolver, &self.config, params.0).await
    }
}

impl ServerHandler for SitesnapServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-sitesnap".into(),
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
    use sitesnap_core::{CacheDb, Error, RecordSchema, ResolverConfig, SiteFetcher};

    struct NoopFetcher;

    #[async_trait::async_trait]
    impl SiteFetcher for NoopFetcher {
        async fn fetch(&self, _url: &str) -> Result<String, Error> {
            Ok(String::new())
        }
    }

    async fn server() -> SitesnapServer {
        let db = CacheDb::open_in_memory(RecordSchema::default()).await.unwrap();
        let resolver = Resolver::new(Arc::new(db), Arc::new(NoopFetcher), ResolverConfig::default());
        SitesnapServer::new(resolver, AppConfig::default())
    }

    #[tokio::test]
    async fn test_lists_sites_data_tool() {
        let server = server().await;
        let tools = server.tool_router.list_all();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "sites_data");
    }

    #[tokio::test]
    async fn test_server_info() {
        let info = server().await.get_info();
        assert_eq!(info.server_info.name, "mcp-sitesnap");
        assert!(info.capabilities.tools.is_some());
    }
}
