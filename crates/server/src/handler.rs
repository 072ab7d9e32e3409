//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::tools::cache::{CacheLookupParams, lookup_impl, purge_impl};
use crate::tools::{CourseTermsParams, course_terms_impl};

use coursenav_client::Navigator;
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

/// The main MCP server handler for course-nav.
#[derive(Clone)]
pub struct CourseNavServer {
    tool_router: ToolRouter<Self>,
    navigator: Navigator,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl CourseNavServer {
    /// Create a new server handler.
    pub fn new(navigator: Navigator) -> Self {
        Self { tool_router: Self::tool_router(), navigator }
    }

    /// List every term of a course and whether a catalog page exists for it.
    ///
    /// Cached answers are reused; unknown terms are probed one at a time.
    #[tool(
        description = "Given a course page URL, list every term of that course with its availability \
                       (available, unavailable, or current). Uses a 7-day cache before probing the catalog."
    )]
    async fn course_terms(&self, params: Parameters<CourseTermsParams>) -> Result<CallToolResult, McpError> {
        course_terms_impl(&self.navigator, params.0).await
    }

    /// Report the cached availability for a single term URL.
    #[tool(description = "Look up the cached availability of a term URL without making a network request.")]
    async fn cache_lookup(&self, params: Parameters<CacheLookupParams>) -> Result<CallToolResult, McpError> {
        lookup_impl(&self.navigator, params.0).await
    }

    /// Remove expired availability entries.
    #[tool(description = "Remove expired entries from the availability cache and report how many were removed.")]
    async fn cache_purge(&self) -> Result<CallToolResult, McpError> {
        purge_impl(&self.navigator).await
    }
}

impl ServerHandler for CourseNavServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "course-nav".into(),
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
    use crate::tools::test_support::navigator;

    #[tokio::test]
    async fn test_tools_registered() {
        let server = CourseNavServer::new(navigator().await);
        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(names, vec!["cache_lookup", "cache_purge", "course_terms"]);
    }

    #[tokio::test]
    async fn test_server_info() {
        let server = CourseNavServer::new(navigator().await);
        let info = server.get_info();
        assert_eq!(info.server_info.name, "course-nav");
    }
}
