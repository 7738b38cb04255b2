//! MCP server handler over the tool registry.

use std::sync::Arc;

use rmcp::model::{
    CallToolRequestParams, CallToolResult, ErrorData, Implementation, ListToolsResult,
    PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler};

use super::bridge::{map_arguments, map_outcome_to_result, map_tool_to_mcp};
use crate::client::HubClient;
use crate::error::HubError;
use crate::tools::{ToolContext, ToolRegistry};

const INSTRUCTIONS: &str = "Tools for the CSGHub platform. Most tools need the user's CSGHub access token in the `token` argument. Every tool returns a JSON document; failures are {\"error_code\", \"error_message\"} with error_code 0 when no HTTP status applies.";

/// Serves a fixed tool registry against one hub.
///
/// Cheap to clone; the streamable HTTP transport clones it per session.
#[derive(Debug, Clone)]
pub struct HubServer {
    registry: Arc<ToolRegistry>,
    ctx: ToolContext,
}

impl HubServer {
    pub fn new(registry: ToolRegistry, client: HubClient) -> Self {
        Self {
            registry: Arc::new(registry),
            ctx: ToolContext::new(client),
        }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }
}

impl ServerHandler for HubServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("CSGHub MCP".to_string()),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        let tools = self
            .registry
            .tools()
            .iter()
            .map(|tool| map_tool_to_mcp(tool.as_ref()))
            .collect();
        Ok(ListToolsResult::with_all_items(tools))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        let args = map_arguments(request.arguments);
        match self.registry.invoke(&request.name, args, &self.ctx).await {
            Ok(outcome) => Ok(map_outcome_to_result(outcome)),
            Err(e @ HubError::UnknownTool(_)) => Err(ErrorData::invalid_params(e.to_string(), None)),
            Err(e) => Err(ErrorData::internal_error(e.to_string(), None)),
        }
    }
}
