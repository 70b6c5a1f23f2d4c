//! Tool-call argument types shared across the docsearch MCP tool surface.

use docsearch_core::types::SearchMode;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default `maxTokens` when a `search` call omits it (spec §6).
pub const DEFAULT_MAX_TOKENS: u32 = 25_000;
/// Minimum accepted `maxTokens` (spec §6).
pub const MIN_MAX_TOKENS: u32 = 500;
/// Maximum accepted `maxTokens` (spec §6).
pub const MAX_MAX_TOKENS: u32 = 50_000;

/// Wire representation of [`SearchMode`], kept separate so the core crate
/// doesn't need a `schemars` dependency just for tool-input validation.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchModeArg {
    /// Permissive ranking: low minimum-score ratio.
    Broad,
    /// Moderate ranking (default).
    #[default]
    Balanced,
    /// Strict ranking: only very close matches survive.
    Precise,
}

impl From<SearchModeArg> for SearchMode {
    fn from(arg: SearchModeArg) -> Self {
        match arg {
            SearchModeArg::Broad => Self::Broad,
            SearchModeArg::Balanced => Self::Balanced,
            SearchModeArg::Precise => Self::Precise,
        }
    }
}
