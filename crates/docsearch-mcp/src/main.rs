//! MCP (Model Context Protocol) server for docsearch.
//!
//! Exposes `list-libraries`, `search`, and `by-id` over stdio for AI
//! assistants to search configured `llms.txt` documentation libraries.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    docsearch_mcp::serve_stdio().await?;
    Ok(())
}
