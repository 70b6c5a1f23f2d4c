//! Markdown document splitting (spec §4.4).
//!
//! Turns a fetched markdown document into a metadata block plus an ordered
//! list of [`EnhancedChunk`]s, each carrying the heading path active when it
//! was flushed. Metadata extraction is a small regex-free scan; the chunking
//! walk is built on `pulldown-cmark`'s flat event stream rather than a full
//! owned AST, since the splitter only ever needs to look at one event at a
//! time plus a handful of open-frame accumulators.

mod table;
mod walker;

use crate::types::{MarkdownMetadata, RemoteMarkdown};

const METADATA_FENCE: &str = "*****";
const TITLE_SEPARATOR_PREFIX: &str = "-----";
const DEFAULT_TITLE: &str = "No Title";

/// Splits `markdown` (as fetched from `link`) into metadata and chunks.
#[must_use]
pub fn split(link: &str, markdown: &str) -> RemoteMarkdown {
    let (metadata, mut body) = extract_metadata(markdown);

    if metadata.title != DEFAULT_TITLE {
        if let Some(sep_pos) = find_title_separator(body) {
            body = &body[sep_pos..];
        }
    }

    let enhanced_chunks = walker::walk(&metadata.title, body);

    RemoteMarkdown {
        link: link.to_string(),
        markdown: body.to_string(),
        metadata,
        enhanced_chunks,
    }
}

/// Parses a leading `*****`-delimited metadata block, if present.
///
/// Recognized lines inside the block (case-insensitive key): `Title: ...`,
/// `Description: ...`, `Keywords: a, b, c`. Returns the metadata (defaulting
/// to `title = "No Title"` when no block is found) and the remainder of the
/// document with the block stripped.
fn extract_metadata(markdown: &str) -> (MarkdownMetadata, &str) {
    let trimmed_start = markdown.trim_start();
    if !trimmed_start.starts_with(METADATA_FENCE) {
        return (
            MarkdownMetadata {
                title: DEFAULT_TITLE.to_string(),
                description: String::new(),
                keywords: Vec::new(),
            },
            markdown,
        );
    }

    let after_open = &trimmed_start[METADATA_FENCE.len()..];
    let Some(fence_close) = after_open.find(METADATA_FENCE) else {
        return (
            MarkdownMetadata {
                title: DEFAULT_TITLE.to_string(),
                description: String::new(),
                keywords: Vec::new(),
            },
            markdown,
        );
    };

    let block = &after_open[..fence_close];
    let rest = &after_open[fence_close + METADATA_FENCE.len()..];

    let mut title = None;
    let mut description = String::new();
    let mut keywords = Vec::new();

    for line in block.lines() {
        let line = line.trim();
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match key.trim().to_lowercase().as_str() {
            "title" if !value.is_empty() => title = Some(value.to_string()),
            "description" => description = value.to_string(),
            "keywords" => {
                keywords = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
            },
            _ => {},
        }
    }

    (
        MarkdownMetadata {
            title: title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description,
            keywords,
        },
        rest,
    )
}

/// Finds the index just past a line consisting of five or more dashes,
/// used as a preamble/body separator beneath a recognized title.
fn find_title_separator(body: &str) -> Option<usize> {
    let mut offset = 0;
    for line in body.lines() {
        let line_end = offset + line.len();
        if line.trim() == TITLE_SEPARATOR_PREFIX
            || (line.trim().len() >= 5 && line.trim().chars().all(|c| c == '-'))
        {
            let after_newline = body[line_end..].find('\n').map_or(line_end, |p| line_end + p + 1);
            return Some(after_newline);
        }
        offset = line_end + 1;
        if offset > body.len() {
            break;
        }
    }
    None
}
