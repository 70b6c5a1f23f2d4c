//! `by-id` tool: full-document retrieval by numeric id (spec §6).

use rmcp::ErrorData as McpError;
use rmcp::model::{CallToolResult, Content};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::server::McpServer;

/// Parameters for the `by-id` tool.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ByIdParams {
    /// Id of the configured library to look up the document in.
    pub library_id: String,
    /// Document id, as a non-negative integer string.
    pub id: String,
}

pub async fn handle_by_id(server: &McpServer, params: ByIdParams) -> Result<CallToolResult, McpError> {
    if params.library_id.trim().is_empty() {
        return Ok(CallToolResult::error(vec![Content::text("libraryId must not be empty")]));
    }

    let Ok(id) = params.id.parse::<u32>() else {
        return Ok(CallToolResult::error(vec![Content::text(format!(
            "invalid document id '{}': expected a non-negative integer",
            params.id
        ))]));
    };

    let repo = match server.manager().get(&params.library_id).await {
        Ok(repo) => repo,
        Err(err) => return Ok(CallToolResult::error(vec![Content::text(err.to_string())])),
    };

    let document = match repo.by_id(&params.library_id, id) {
        Ok(doc) => doc,
        Err(err) => return Ok(CallToolResult::error(vec![Content::text(err.to_string())])),
    };

    let fragments = document.chunks.iter().map(|chunk| Content::text(chunk.raw_text.clone())).collect();
    Ok(CallToolResult::success(fragments))
}

#[cfg(test)]
mod tests {
    #[test]
    fn non_integer_id_is_rejected() {
        assert!("abc".parse::<u32>().is_err());
    }

    #[test]
    fn negative_id_is_rejected() {
        assert!("-1".parse::<u32>().is_err());
    }

    #[test]
    fn non_negative_integer_id_parses() {
        assert_eq!("42".parse::<u32>().unwrap(), 42);
    }
}
