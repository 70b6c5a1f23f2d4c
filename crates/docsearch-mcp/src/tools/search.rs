//! `search` tool: ranked keyword search over a library (spec §6).

use rmcp::ErrorData as McpError;
use rmcp::model::{CallToolResult, Content};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::server::McpServer;
use crate::types::{DEFAULT_MAX_TOKENS, MAX_MAX_TOKENS, MIN_MAX_TOKENS, SearchModeArg};

/// Parameters for the `search` tool.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Id of the configured library to search.
    pub library_id: String,
    /// Keywords to search for; each is synonym-expanded and tokenized.
    pub keywords: Vec<String>,
    /// Ranking mode; defaults to `balanced`.
    pub search_mode: Option<SearchModeArg>,
    /// Maximum tokens in the returned payload; defaults to 25000, clamped
    /// to `[500, 50000]`.
    pub max_tokens: Option<u32>,
}

pub async fn handle_search(server: &McpServer, params: SearchParams) -> Result<CallToolResult, McpError> {
    if params.library_id.trim().is_empty() {
        return Ok(CallToolResult::error(vec![Content::text("libraryId must not be empty")]));
    }

    let max_tokens = params.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);
    if !(MIN_MAX_TOKENS..=MAX_MAX_TOKENS).contains(&max_tokens) {
        return Ok(CallToolResult::error(vec![Content::text(format!(
            "maxTokens must be between {MIN_MAX_TOKENS} and {MAX_MAX_TOKENS}, got {max_tokens}"
        ))]));
    }

    let repo = match server.manager().get(&params.library_id).await {
        Ok(repo) => repo,
        Err(err) => return Ok(CallToolResult::error(vec![Content::text(err.to_string())])),
    };

    let mode = params.search_mode.unwrap_or_default().into();
    let text = repo.search(docsearch_core::Partition::All, &params.keywords, mode, max_tokens);

    Ok(CallToolResult::success(vec![Content::text(text)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_library_id_is_rejected_before_manager_lookup() {
        assert!("".trim().is_empty());
    }

    #[test]
    fn max_tokens_bounds_match_spec() {
        assert_eq!(MIN_MAX_TOKENS, 500);
        assert_eq!(MAX_MAX_TOKENS, 50_000);
        assert_eq!(DEFAULT_MAX_TOKENS, 25_000);
    }
}
