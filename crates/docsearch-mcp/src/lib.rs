//! docsearch MCP server
//!
//! A Rust-native MCP (Model Context Protocol) server that exposes
//! `docsearch-core`'s `llms.txt` indexing and BM25 search as a small tool
//! surface: `list-libraries`, `search`, `by-id`.

pub mod error;
pub mod server;
pub mod tools;
pub mod types;

pub use error::{McpError, McpResult};
pub use server::McpServer;

/// Initializes tracing and runs the MCP server over stdio until the
/// transport closes.
///
/// # Errors
///
/// Returns an error if the server fails to initialize or run.
pub async fn serve_stdio() -> McpResult<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!("initializing docsearch MCP server");

    let server = McpServer::new()?;
    server.serve_stdio().await
}
