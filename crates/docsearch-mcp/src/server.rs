//! MCP server implementation for docsearch.

use std::sync::Arc;

use docsearch_core::{Config, Manager};
use rmcp::ServerHandler;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router};

use crate::error::McpResult;
use crate::tools::{ByIdParams, SearchParams, handle_by_id, handle_list_libraries, handle_search};

/// MCP server for docsearch.
#[derive(Clone)]
pub struct McpServer {
    manager: Arc<Manager>,
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Creates a new server, loading the library registry from the default
    /// config path. Repositories are not built until first requested.
    pub fn new() -> McpResult<Self> {
        let config = Config::load(&Config::default_path()?)?;
        Self::with_config(config)
    }

    /// Creates a new server from an already-loaded configuration, mainly
    /// for tests.
    pub fn with_config(config: Config) -> McpResult<Self> {
        Ok(Self {
            manager: Arc::new(Manager::new(config)?),
            tool_router: Self::tool_router(),
        })
    }

    /// The shared repository manager, used by tool handlers.
    #[must_use]
    pub fn manager(&self) -> &Manager {
        &self.manager
    }

    /// Serve the MCP protocol over stdio.
    pub async fn serve_stdio(&self) -> McpResult<()> {
        tracing::info!("docsearch MCP server starting");

        let stdin = tokio::io::stdin();
        let stdout = tokio::io::stdout();

        let service = rmcp::serve_server(self.clone(), (stdin, stdout)).await.map_err(|e| {
            tracing::error!("server initialization error: {}", e);
            crate::error::McpError::Protocol(e.to_string())
        })?;

        service.waiting().await.map_err(|e| {
            tracing::error!("server runtime error: {}", e);
            crate::error::McpError::Protocol(e.to_string())
        })?;

        tracing::info!("docsearch MCP server stopped");
        Ok(())
    }
}

#[tool_router]
impl McpServer {
    #[tool(
        name = "list-libraries",
        description = "List every configured documentation library and whether it is currently available."
    )]
    async fn list_libraries(&self) -> Result<CallToolResult, rmcp::ErrorData> {
        handle_list_libraries(self).await
    }

    #[tool(
        name = "search",
        description = "Ranked keyword search over a documentation library's indexed chunks, bounded by a token budget."
    )]
    async fn search(&self, Parameters(params): Parameters<SearchParams>) -> Result<CallToolResult, rmcp::ErrorData> {
        handle_search(self, params).await
    }

    #[tool(
        name = "by-id",
        description = "Retrieve a documentation library's full document by its numeric id, one fragment per chunk."
    )]
    async fn by_id(&self, Parameters(params): Parameters<ByIdParams>) -> Result<CallToolResult, rmcp::ErrorData> {
        handle_by_id(self, params).await
    }
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "docsearch-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Documentation search over configured llms.txt libraries. \
                Call list-libraries to see what's available, search for ranked \
                keyword results, and by-id to retrieve a full document."
                    .to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_info_reports_name_and_version() {
        let server = McpServer::with_config(Config::default()).expect("failed to create server");
        let info = server.get_info();
        assert_eq!(info.server_info.name, "docsearch-mcp");
        assert!(!info.server_info.version.is_empty());
    }
}
