//! Custom Okapi BM25 ranker (spec §4.6).
//!
//! Built from scratch rather than on `tantivy`: this index needs per-mode
//! `k1`/`b` and a min-score-ratio filter applied at query time, which
//! doesn't map onto `tantivy`'s fixed-at-build-time BM25 similarity. The
//! corpus here is small enough (one documentation library's chunks) that a
//! simple in-memory postings map is the right trade-off.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{DocumentChunk, ModeParams, SearchMode, SearchResult};

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z0-9_]+").expect("valid regex"));

/// Case-insensitive tokenization shared by indexing and querying: splits on
/// whitespace and punctuation, keeping underscore-joined identifiers whole.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    TOKEN_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

struct Posting {
    chunk_index: usize,
    term_freq: u32,
}

/// A read-only BM25 index over one partition's chunks (spec §4.6, §4.11:
/// "one BM25 index per partition").
///
/// Built once; queries run with no interior mutability and no locking.
pub struct Bm25Index {
    chunks: Vec<DocumentChunk>,
    doc_lengths: Vec<u32>,
    avg_doc_length: f32,
    postings: HashMap<String, Vec<Posting>>,
}

impl Bm25Index {
    /// Builds an index over `chunks`. Tokenizes `chunk.text` for both
    /// document length and term frequency, per spec §4.6.
    #[must_use]
    pub fn build(chunks: Vec<DocumentChunk>) -> Self {
        let mut postings: HashMap<String, Vec<Posting>> = HashMap::new();
        let mut doc_lengths = Vec::with_capacity(chunks.len());

        for (index, chunk) in chunks.iter().enumerate() {
            let tokens = tokenize(&chunk.text);
            doc_lengths.push(tokens.len() as u32);

            let mut term_freqs: HashMap<String, u32> = HashMap::new();
            for token in tokens {
                *term_freqs.entry(token).or_insert(0) += 1;
            }
            for (term, term_freq) in term_freqs {
                postings.entry(term).or_default().push(Posting {
                    chunk_index: index,
                    term_freq,
                });
            }
        }

        let avg_doc_length = if doc_lengths.is_empty() {
            0.0
        } else {
            doc_lengths.iter().sum::<u32>() as f32 / doc_lengths.len() as f32
        };

        Self {
            chunks,
            doc_lengths,
            avg_doc_length,
            postings,
        }
    }

    /// Number of chunks in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// `true` if the index holds no chunks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// The indexed chunks, for resolution by chunk id elsewhere.
    #[must_use]
    pub fn chunks(&self) -> &[DocumentChunk] {
        &self.chunks
    }

    /// Runs a BM25 query, filters by `mode`'s min-score ratio, and returns
    /// results sorted descending by score, ties broken by ascending
    /// `chunkId` (spec §4.6).
    #[must_use]
    pub fn search(&self, query_terms: &[String], mode: SearchMode) -> Vec<SearchResult> {
        if self.chunks.is_empty() || query_terms.is_empty() {
            return Vec::new();
        }
        let params = mode.params();

        let mut scores = vec![0.0f32; self.chunks.len()];
        for term in query_terms {
            let term = term.to_lowercase();
            let Some(postings) = self.postings.get(&term) else {
                continue;
            };
            let idf = self.idf(postings.len());
            for posting in postings {
                scores[posting.chunk_index] +=
                    idf * self.term_score(posting, params);
            }
        }

        let max_score = scores.iter().copied().fold(0.0f32, f32::max);
        if max_score <= 0.0 {
            return Vec::new();
        }
        let min_score = max_score * params.min_score_ratio;

        let mut results: Vec<SearchResult> = self
            .chunks
            .iter()
            .zip(scores.iter())
            .filter(|(_, &score)| score >= min_score)
            .map(|(chunk, &score)| SearchResult {
                id: chunk.id,
                chunk_id: chunk.chunk_id,
                score,
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.chunk_id.cmp(&b.chunk_id))
        });
        results
    }

    /// `idf(term) = ln((N - df + 0.5)/(df + 0.5) + 1)`, clamped to `>= 0`.
    fn idf(&self, doc_freq: usize) -> f32 {
        let n = self.chunks.len() as f32;
        let df = doc_freq as f32;
        (((n - df + 0.5) / (df + 0.5)) + 1.0).ln().max(0.0)
    }

    fn term_score(&self, posting: &Posting, params: ModeParams) -> f32 {
        let tf = posting.term_freq as f32;
        let doc_len = self.doc_lengths[posting.chunk_index] as f32;
        let norm = 1.0 - params.b + params.b * (doc_len / self.avg_doc_length.max(1.0));
        (tf * (params.k1 + 1.0)) / (tf + params.k1 * norm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: u32, chunk_id: u32, text: &str) -> DocumentChunk {
        DocumentChunk {
            id,
            chunk_id,
            origin_title: "Title".into(),
            text: text.to_string(),
            raw_text: text.to_string(),
            word_count: text.split_whitespace().count() as u32,
            estimated_tokens: 10,
            header_stack: vec![],
        }
    }

    #[test]
    fn tokenize_lowercases_and_splits_on_punctuation() {
        assert_eq!(tokenize("Hello, World!"), vec!["hello", "world"]);
    }

    #[test]
    fn search_ranks_exact_term_matches_above_irrelevant_chunks() {
        let index = Bm25Index::build(vec![
            chunk(0, 0, "widgets are great for payments"),
            chunk(1, 1000, "this document is about something unrelated entirely"),
        ]);
        let results = index.search(&["widgets".to_string()], SearchMode::Balanced);
        assert!(!results.is_empty());
        assert_eq!(results[0].chunk_id, 0);
    }

    #[test]
    fn empty_query_returns_no_results() {
        let index = Bm25Index::build(vec![chunk(0, 0, "some text")]);
        assert!(index.search(&[], SearchMode::Balanced).is_empty());
    }

    #[test]
    fn results_are_sorted_descending_by_score() {
        let index = Bm25Index::build(vec![
            chunk(0, 0, "widget widget widget"),
            chunk(1, 1000, "widget appears once here"),
        ]);
        let results = index.search(&["widget".to_string()], SearchMode::Broad);
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn ties_are_broken_by_ascending_chunk_id() {
        let index = Bm25Index::build(vec![
            chunk(1, 1000, "widget"),
            chunk(0, 0, "widget"),
        ]);
        let results = index.search(&["widget".to_string()], SearchMode::Balanced);
        assert_eq!(results[0].chunk_id, 0);
        assert_eq!(results[1].chunk_id, 1000);
    }

    #[test]
    fn precise_mode_has_a_stricter_min_score_ratio_than_broad() {
        let index = Bm25Index::build(vec![
            chunk(0, 0, "widget widget widget payments"),
            chunk(1, 1000, "widget mentioned once in passing"),
        ]);
        let broad = index.search(&["widget".to_string()], SearchMode::Broad).len();
        let precise = index.search(&["widget".to_string()], SearchMode::Precise).len();
        assert!(precise <= broad);
    }

    #[test]
    fn unknown_term_contributes_nothing() {
        let index = Bm25Index::build(vec![chunk(0, 0, "widget payments")]);
        let results = index.search(&["xyzzy".to_string()], SearchMode::Broad);
        assert!(results.is_empty());
    }

    #[test]
    fn empty_index_returns_no_results() {
        let index = Bm25Index::build(vec![]);
        assert!(index.search(&["widget".to_string()], SearchMode::Balanced).is_empty());
    }
}
