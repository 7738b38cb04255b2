//! Bridge hub tools into MCP model types.

use std::sync::Arc;

use rmcp::model::{CallToolResult, Content, JsonObject};
use serde_json::Value;

use crate::tools::tool::Tool;
use crate::tools::types::ToolOutcome;
use crate::tools::ToolArguments;

/// Describe a hub tool to MCP clients.
pub fn map_tool_to_mcp(tool: &dyn Tool) -> rmcp::model::Tool {
    let mut mcp_tool = rmcp::model::Tool::new(
        tool.name().to_string(),
        tool.description().to_string(),
        Arc::new(tool.parameters().as_object()),
    );
    mcp_tool.title = tool.title().map(String::from);
    mcp_tool
}

/// The JSON text goes out as a single text block; failures set `is_error`.
pub fn map_outcome_to_result(outcome: ToolOutcome) -> CallToolResult {
    let content = vec![Content::text(outcome.text)];
    if outcome.is_error {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    }
}

/// Missing arguments are an empty object.
pub fn map_arguments(arguments: Option<JsonObject>) -> ToolArguments {
    ToolArguments::new(Value::Object(arguments.unwrap_or_default()))
}
