//! `list-libraries` tool: reports configured libraries and their
//! availability (spec §6).

use rmcp::ErrorData as McpError;
use rmcp::model::{CallToolResult, Content};

use crate::server::McpServer;

pub async fn handle_list_libraries(server: &McpServer) -> Result<CallToolResult, McpError> {
    let statuses = server.manager().statuses().await;
    let json = serde_json::to_string(&statuses)
        .map_err(|err| McpError::internal_error(crate::error::McpError::from(err).to_string(), None))?;
    let text = format!("Configured libraries:\n{json}");
    Ok(CallToolResult::success(vec![Content::text(text)]))
}
