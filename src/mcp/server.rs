use rmcp::model::{
    CallToolRequestParams, CallToolResult, Implementation, JsonObject, ListToolsResult,
    PaginatedRequestParams, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler};
use std::sync::Arc;
use tracing::{debug, warn};

use super::registry::ToolRegistry;

pub const SERVER_NAME: &str = "x-twitter-mcp";

/// MCP server exposing the registered X tools.
#[derive(Clone)]
pub struct XServer {
    registry: Arc<ToolRegistry>,
}

impl XServer {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn registry_handle(&self) -> Arc<ToolRegistry> {
        self.registry.clone()
    }

    /// Run a tool by name. Unknown names are the only protocol-level error;
    /// every handler outcome is a success or error envelope.
    pub async fn invoke(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, McpError> {
        let Some(tool) = self.registry.get(name) else {
            warn!(tool = name, "Call for unknown tool");
            return Err(McpError::invalid_params(
                format!("Unknown tool: {}", name),
                None,
            ));
        };

        debug!(tool = name, "Calling tool");
        Ok((tool.handler)(arguments.unwrap_or_default()).await)
    }
}

impl ServerHandler for XServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Tools for the X (Twitter) API: tweets, timelines, engagement, users, \
                 blocks and mutes, direct messages, lists, media and API usage."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _params: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        debug!(count = self.registry.len(), "Listing tools");
        Ok(ListToolsResult {
            meta: None,
            tools: self.registry.list_tools(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        params: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.invoke(&params.name, params.arguments).await
    }
}
