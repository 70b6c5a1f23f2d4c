//! Error types for the docsearch MCP server, with MCP error code mapping.

use thiserror::Error;

/// Errors that can occur in the MCP server.
#[derive(Debug, Error)]
pub enum McpError {
    /// A core operation failed (library lookup, initialization, document
    /// lookup, parsing, network, configuration).
    #[error("{0}")]
    Core(#[from] docsearch_core::Error),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Protocol error surfaced by the transport layer.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// A tool call argument failed validation (e.g. `maxTokens` out of
    /// range, empty `libraryId`).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl McpError {
    /// Maps this error to a JSON-RPC-style error code for logging/metrics.
    #[must_use]
    pub const fn error_code(&self) -> i32 {
        match self {
            Self::Core(_) => -32603,       // Internal error
            Self::Json(_) => -32700,       // Parse error
            Self::Protocol(_) => -32600,   // Invalid request
            Self::InvalidArgument(_) => -32602, // Invalid params
        }
    }
}

impl From<anyhow::Error> for McpError {
    fn from(err: anyhow::Error) -> Self {
        Self::Protocol(err.to_string())
    }
}

/// Result type alias for MCP operations.
pub type McpResult<T> = Result<T, McpError>;
