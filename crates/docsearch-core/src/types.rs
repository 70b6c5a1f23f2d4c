//! Core data structures shared across the indexing and ranking pipeline.
//!
//! ## Type Categories
//!
//! - **Configuration**: [`LibraryConfig`]
//! - **Parsing intermediates**: [`RawDocument`], [`RemoteMarkdown`], [`MarkdownMetadata`]
//! - **Indexed content**: [`Document`], [`DocumentChunk`], [`EnhancedChunk`]
//! - **Query results**: [`SearchHit`], [`LibraryStatus`]

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Configuration for a single documentation library.
///
/// `id` is expected to match `[a-z0-9-]+` and be unique across the
/// configured set; both are enforced by [`crate::config::LibrariesConfig`]
/// at load time rather than here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryConfig {
    /// Slug identifying the library, e.g. `"react"`.
    pub id: String,
    /// Absolute URL of the library's `llms.txt` index.
    pub index_url: String,
}

/// Editorial category assigned to a document based on its URL path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Blog posts and announcements.
    Blog,
    /// Example or sample code.
    Codes,
    /// Tutorials and walkthroughs.
    Guides,
    /// Miscellaneous supporting resources.
    Resources,
    /// API/reference documentation.
    Reference,
    /// SDK documentation.
    Sdk,
    /// Superseded or archived content.
    Legacy,
    /// No recognized category segment.
    Unknown,
}

impl Category {
    /// Parses a URL path's first segment into a category, defaulting to
    /// [`Category::Unknown`] for anything unrecognized.
    #[must_use]
    pub fn from_path_segment(segment: &str) -> Self {
        match segment {
            "blog" => Self::Blog,
            "codes" => Self::Codes,
            "guides" => Self::Guides,
            "resources" => Self::Resources,
            "reference" => Self::Reference,
            "sdk" => Self::Sdk,
            "legacy" => Self::Legacy,
            _ => Self::Unknown,
        }
    }

    /// The post-BM25 score multiplier for this category (spec §4.7).
    #[must_use]
    pub const fn weight(self) -> f32 {
        match self {
            Self::Guides => 1.2,
            Self::Reference | Self::Sdk | Self::Unknown => 1.0,
            Self::Resources => 0.8,
            Self::Blog => 0.7,
            Self::Codes => 0.5,
            Self::Legacy => 0.4,
        }
    }
}

/// `llms.txt` document version, when one can be inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocVersion {
    /// First-generation documentation.
    V1,
    /// Second-generation documentation.
    V2,
}

/// A single line of a parsed `llms.txt` index, before fetching the document
/// it references.
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// The original, trimmed line this descriptor was parsed from.
    pub raw_line: String,
    /// Derived title (bracket text, last path segment, or host).
    pub title: String,
    /// Absolute link to the markdown document.
    pub link: String,
    /// Version inferred from the URL or title, if any.
    pub version: Option<DocVersion>,
    /// Derived description text.
    pub description: String,
    /// Category inferred from the URL path.
    pub category: Category,
}

/// Metadata extracted from a markdown document's leading metadata block.
#[derive(Debug, Clone, Default)]
pub struct MarkdownMetadata {
    /// Document title; `"No Title"` when none was found.
    pub title: String,
    /// Document description, if present.
    pub description: String,
    /// Keywords listed in the metadata block.
    pub keywords: Vec<String>,
}

/// A fetched and parsed markdown document, prior to chunk indexing.
#[derive(Debug, Clone)]
pub struct RemoteMarkdown {
    /// Absolute link the markdown was fetched from.
    pub link: String,
    /// Full markdown source (after preamble truncation, see §4.4 step 1).
    pub markdown: String,
    /// Extracted metadata block.
    pub metadata: MarkdownMetadata,
    /// Chunks produced by the splitter, in document order.
    pub enhanced_chunks: Vec<EnhancedChunk>,
}

/// A single chunk emitted by the markdown splitter, before it is assigned
/// a stable id by the loader.
#[derive(Debug, Clone)]
pub struct EnhancedChunk {
    /// Chunk text as flushed from the walker's fragment buffer.
    pub content: String,
    /// Heading path from the document root to the deepest relevant
    /// ancestor at the moment this chunk was flushed. Entries may be empty
    /// when heading levels were skipped.
    pub header_stack: Vec<String>,
    /// Eagerly-computed token estimate for `content`.
    pub estimated_tokens: u32,
}

/// A fully indexed document: a library's documentation page, split into
/// chunks and assigned a stable numeric id.
#[derive(Debug, Clone)]
pub struct Document {
    /// Dense id assigned in fetch order, starting at 0.
    pub id: u32,
    /// Document version partition, if known.
    pub version: Option<DocVersion>,
    /// Editorial category.
    pub category: Category,
    /// Original document title.
    pub title: String,
    /// Source URL of the document.
    pub link: String,
    /// Keyword set: each loader keyword as-is, lowercased, and uppercased.
    pub keywords: BTreeSet<String>,
    /// Indexed chunks, in positional (dense, zero-based) order.
    pub chunks: Vec<DocumentChunk>,
}

impl Document {
    /// Returns the chunk at the given stable `chunk_id`, if it belongs to
    /// this document and is in range.
    #[must_use]
    pub fn chunk_by_chunk_id(&self, chunk_id: u32) -> Option<&DocumentChunk> {
        if chunk_id / 1000 != self.id {
            return None;
        }
        let index = (chunk_id % 1000) as usize;
        self.chunks.get(index)
    }
}

/// An indexed chunk of a [`Document`], carrying both the search-ready
/// (metadata-prefixed) text and the raw content.
#[derive(Debug, Clone)]
pub struct DocumentChunk {
    /// Owning document's id.
    pub id: u32,
    /// Stable composite identifier: `id * 1000 + positional_index`.
    pub chunk_id: u32,
    /// Document title, copied for convenient display.
    pub origin_title: String,
    /// `raw_text` with a prepended metadata block (keywords, header path).
    /// Used for BM25 indexing.
    pub text: String,
    /// The original chunk content with no metadata prefix. Used for
    /// rendering truncated output (see spec §9 Open Questions).
    pub raw_text: String,
    /// Word count of `raw_text`.
    pub word_count: u32,
    /// Estimated token cost of `raw_text`.
    pub estimated_tokens: u32,
    /// Heading path snapshot at the point this chunk was emitted.
    pub header_stack: Vec<String>,
}

/// A single BM25 match, prior to reweighting or assembly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    /// Owning document id.
    pub id: u32,
    /// Stable chunk id.
    pub chunk_id: u32,
    /// BM25 (optionally reweighted) score.
    pub score: f32,
}

/// Reported availability of a single configured library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryStatus {
    /// The library id.
    pub id: String,
    /// `false` only when initialization previously failed and was memoized.
    pub available: bool,
    /// The memoized failure message, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Search ranking mode, selecting BM25 parameters and a minimum-score ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Permissive: low minimum-score ratio, flatter length normalization.
    Broad,
    /// Default: moderate ratio and normalization.
    Balanced,
    /// Strict: only very close matches survive.
    Precise,
}

impl Default for SearchMode {
    fn default() -> Self {
        Self::Balanced
    }
}

/// BM25 tuning parameters for a [`SearchMode`].
#[derive(Debug, Clone, Copy)]
pub struct ModeParams {
    /// Term-frequency saturation parameter.
    pub k1: f32,
    /// Length-normalization parameter.
    pub b: f32,
    /// Minimum-score ratio relative to the top score in a query's results.
    pub min_score_ratio: f32,
}

impl SearchMode {
    /// Returns the BM25 tuning parameters for this mode (spec §4.6 table).
    #[must_use]
    pub const fn params(self) -> ModeParams {
        match self {
            Self::Broad => ModeParams {
                k1: 1.0,
                b: 0.5,
                min_score_ratio: 0.1,
            },
            Self::Balanced => ModeParams {
                k1: 1.2,
                b: 0.75,
                min_score_ratio: 0.5,
            },
            Self::Precise => ModeParams {
                k1: 1.5,
                b: 0.9,
                min_score_ratio: 1.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_weights_match_spec_table() {
        assert_eq!(Category::Guides.weight(), 1.2);
        assert_eq!(Category::Reference.weight(), 1.0);
        assert_eq!(Category::Sdk.weight(), 1.0);
        assert_eq!(Category::Resources.weight(), 0.8);
        assert_eq!(Category::Blog.weight(), 0.7);
        assert_eq!(Category::Codes.weight(), 0.5);
        assert_eq!(Category::Legacy.weight(), 0.4);
        assert_eq!(Category::Unknown.weight(), 1.0);
    }

    #[test]
    fn category_from_path_segment_defaults_to_unknown() {
        assert_eq!(Category::from_path_segment("guides"), Category::Guides);
        assert_eq!(Category::from_path_segment("bogus"), Category::Unknown);
    }

    #[test]
    fn chunk_id_round_trips_to_owning_document() {
        let doc = Document {
            id: 7,
            version: None,
            category: Category::Unknown,
            title: "Title".into(),
            link: "https://example.com".into(),
            keywords: BTreeSet::new(),
            chunks: vec![DocumentChunk {
                id: 7,
                chunk_id: 7 * 1000 + 3,
                origin_title: "Title".into(),
                text: String::new(),
                raw_text: String::new(),
                word_count: 0,
                estimated_tokens: 1,
                header_stack: vec![],
            }],
        };
        assert!(doc.chunk_by_chunk_id(7003).is_some());
        assert!(doc.chunk_by_chunk_id(8003).is_none());
    }

    #[test]
    fn search_mode_params_match_spec_table() {
        let broad = SearchMode::Broad.params();
        assert_eq!((broad.k1, broad.b, broad.min_score_ratio), (1.0, 0.5, 0.1));
        let balanced = SearchMode::Balanced.params();
        assert_eq!(
            (balanced.k1, balanced.b, balanced.min_score_ratio),
            (1.2, 0.75, 0.5)
        );
        let precise = SearchMode::Precise.params();
        assert_eq!(
            (precise.k1, precise.b, precise.min_score_ratio),
            (1.5, 0.9, 1.0)
        );
    }
}
