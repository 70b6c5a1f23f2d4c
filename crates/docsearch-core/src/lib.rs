//! # docsearch-core
//!
//! Core functionality for docsearch - indexing and BM25 search over
//! `llms.txt`-style documentation libraries.
//!
//! This crate provides the foundational components for parsing a library's
//! `llms.txt` index, fetching and chunking the markdown documents it
//! references, and serving token-budgeted keyword search over the result.
//!
//! ## Architecture
//!
//! - **Configuration**: [`config`] — TOML-backed library registry
//! - **Parsing**: [`index_parser`] (the index file itself) and [`markdown`]
//!   (the documents it references)
//! - **Ranking**: [`bm25`], [`reweight`], [`synonyms`]
//! - **Output shaping**: [`truncate`], [`assembler`]
//! - **Orchestration**: [`repository`] (one library) and [`manager`] (all
//!   configured libraries, lazily initialized)
//! - **Types**: [`types`] — core data structures
//! - **Error Handling**: [`error`] — categorized error types
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docsearch_core::{Config, Manager, Result};
//!
//! # async fn run() -> Result<()> {
//! let config = Config::load(&Config::default_path()?)?;
//! let manager = Manager::new(config)?;
//! let repo = manager.get("react").await?;
//! println!("loaded {} documents", repo.document_count());
//! # Ok(())
//! # }
//! ```

/// Result assembly: grouping, windowing, and smart truncation into text.
pub mod assembler;
/// Custom Okapi BM25 ranker.
pub mod bm25;
/// TOML-backed library registry configuration.
pub mod config;
/// Error types and result alias.
pub mod error;
/// HTTP fetching for indices and documents.
pub mod fetcher;
/// Heading text sanitization.
pub mod heading;
/// `llms.txt` index line parsing.
pub mod index_parser;
/// Document loading: fetch + split + chunk assignment.
pub mod loader;
/// Lazy, coalesced, error-memoizing repository manager.
pub mod manager;
/// Markdown splitting into enhanced chunks.
pub mod markdown;
/// Category-weight reranking.
pub mod reweight;
/// Per-library repository: partitions, search, direct lookup.
pub mod repository;
/// Synonym expansion dictionary.
pub mod synonyms;
/// Token estimation heuristic.
pub mod token;
/// Smart truncation at semantic boundaries.
pub mod truncate;
/// Core data types and structures.
pub mod types;
/// URL resolution utilities.
pub mod urlutil;

pub use config::LibrariesConfig as Config;
pub use error::{Error, Result};
pub use fetcher::Fetcher;
pub use manager::Manager;
pub use repository::{Partition, Repository};
pub use types::*;
