//! MCP server implementation.
//!
//! JSON-RPC framing, the initialize handshake and request routing are left
//! to `rmcp`; this module only answers `tools/list` and `tools/call`.

use std::sync::Arc;

use issue_creator_core::Error;
use rmcp::model::*;
use rmcp::service::RequestContext;
use rmcp::{Error as McpError, RoleServer, ServerHandler, ServiceExt};
use tracing::info;

use crate::handlers::ToolHandler;

/// Name reported in `serverInfo`.
pub const SERVER_NAME: &str = "gitlab-issue-creator";

/// MCP server for gitlab-issue-creator.
#[derive(Clone)]
pub struct McpServer {
    handler: Arc<ToolHandler>,
}

impl McpServer {
    /// Create a new MCP server that reads its configuration from the environment.
    pub fn new() -> Self {
        Self::with_handler(ToolHandler::new())
    }

    /// Create a server around an existing tool handler.
    pub fn with_handler(handler: ToolHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Serve on stdin/stdout until the client disconnects.
    pub async fn run(self) -> anyhow::Result<()> {
        info!("Starting MCP server {} via stdio", SERVER_NAME);

        let transport = (tokio::io::stdin(), tokio::io::stdout());
        let server = self.serve(transport).await?;

        let quit_reason = server.waiting().await?;
        info!("MCP server shut down: {:?}", quit_reason);
        Ok(())
    }
}

impl Default for McpServer {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
            },
            instructions: Some(
                "Use create_gitlab_issue to open an issue in a GitLab project.".into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.handler.available_tools(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        info!("Calling tool: {}", request.name);

        self.handler
            .execute(&request.name, request.arguments)
            .await
            .map_err(|e| match e {
                Error::UnknownTool(_) => {
                    tracing::warn!("{}", e);
                    McpError::invalid_params(e.to_string(), None)
                }
                other => McpError::internal_error(other.to_string(), None),
            })
    }
}
