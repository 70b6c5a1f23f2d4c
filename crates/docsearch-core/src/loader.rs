//! Document loader: turns parsed index lines into indexed [`Document`]s
//! (spec §4.5).
//!
//! Fetches are bounded-concurrency and independently fallible; a failed
//! fetch or a document with zero chunks is logged and skipped rather than
//! aborting the whole load, so one broken link in a library's index does
//! not take the whole library down.

use std::collections::BTreeSet;

use futures::stream::{self, StreamExt};
use tracing::warn;

use crate::fetcher::Fetcher;
use crate::markdown;
use crate::token;
use crate::types::{Document, DocumentChunk, RawDocument};

/// Maximum concurrent in-flight document fetches per library load.
const FETCH_CONCURRENCY: usize = 8;

/// Fetches and indexes every document referenced by `raw_docs`, assigning
/// dense zero-based ids in `raw_docs` order.
///
/// Fetches run with bounded concurrency but results are reassembled in
/// input order (`buffered`, not `buffer_unordered`) so id assignment is
/// deterministic regardless of which fetch happens to complete first.
pub async fn load(fetcher: &Fetcher, raw_docs: &[RawDocument]) -> Vec<Document> {
    let results: Vec<Option<(&RawDocument, String)>> = stream::iter(raw_docs)
        .map(|raw| async move {
            match fetcher.fetch(&raw.link).await {
                Ok(markdown) => Some((raw, markdown)),
                Err(err) => {
                    warn!(link = %raw.link, error = %err, "skipping document: fetch failed");
                    None
                },
            }
        })
        .buffered(FETCH_CONCURRENCY)
        .collect()
        .await;

    let mut documents = Vec::new();
    for (raw, markdown_source) in results.into_iter().flatten() {
        let remote = markdown::split(&raw.link, &markdown_source);
        if remote.enhanced_chunks.is_empty() {
            warn!(link = %raw.link, "skipping document: no chunks produced");
            continue;
        }

        let id = documents.len() as u32;
        let keywords = expand_keywords(&remote.metadata.keywords);

        let chunks = remote
            .enhanced_chunks
            .iter()
            .enumerate()
            .map(|(index, chunk)| build_document_chunk(id, index as u32, &raw.title, &keywords, chunk))
            .collect();

        documents.push(Document {
            id,
            version: raw.version,
            category: raw.category,
            title: raw.title.clone(),
            link: raw.link.clone(),
            keywords,
            chunks,
        });
    }

    documents
}

fn expand_keywords(keywords: &[String]) -> BTreeSet<String> {
    let mut set = BTreeSet::new();
    for kw in keywords {
        set.insert(kw.clone());
        set.insert(kw.to_lowercase());
        set.insert(kw.to_uppercase());
    }
    set
}

fn build_document_chunk(
    id: u32,
    index: u32,
    title: &str,
    keywords: &BTreeSet<String>,
    chunk: &crate::types::EnhancedChunk,
) -> DocumentChunk {
    let raw_text = chunk.content.clone();
    let text = format_metadata_prefixed_text(title, keywords, &chunk.header_stack, &raw_text);

    DocumentChunk {
        id,
        chunk_id: id * 1000 + index,
        origin_title: title.to_string(),
        word_count: raw_text.split_whitespace().count() as u32,
        estimated_tokens: token::estimate(&raw_text),
        text,
        raw_text,
        header_stack: chunk.header_stack.clone(),
    }
}

/// Prefixes `raw_text` with a small metadata block used only for BM25
/// indexing (spec §4.4 `DocumentChunk.text`): keywords and the heading
/// path, so a query term that only appears in metadata still matches.
fn format_metadata_prefixed_text(
    title: &str,
    keywords: &BTreeSet<String>,
    header_stack: &[String],
    raw_text: &str,
) -> String {
    let keyword_line = if keywords.is_empty() {
        String::new()
    } else {
        format!("Keywords: {}\n", keywords.iter().cloned().collect::<Vec<_>>().join(", "))
    };
    let path_line = if header_stack.is_empty() {
        String::new()
    } else {
        format!("Path: {}\n", header_stack.join(" > "))
    };
    format!("Title: {title}\n{keyword_line}{path_line}{raw_text}")
}
