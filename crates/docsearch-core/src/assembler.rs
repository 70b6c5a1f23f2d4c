//! Result assembler: `normalize` and `chunksForIds` (spec §4.9).
//!
//! Turns reweighted BM25 hits into the final text payload returned to a
//! caller: groups hits by document, expands each to a neighboring-chunk
//! window, smart-truncates under the remaining budget, and prepends a
//! document header.

use std::collections::BTreeSet;

use crate::truncate;
use crate::types::{Document, SearchResult};

/// Number of neighboring chunks included on each side of a matched chunk
/// (spec §4.9 step 2a: `windowSize=1`).
const WINDOW_SIZE: u32 = 1;

/// Assembles reweighted results into the final text payload.
///
/// `resolve` looks up a [`Document`] by id; a `None` return (document
/// disappeared between search and assembly) skips that group.
#[must_use]
pub fn normalize(results: &[SearchResult], max_tokens: u32, resolve: impl Fn(u32) -> Option<Document>) -> String {
    let mut seen_docs = BTreeSet::new();
    let mut groups: Vec<(u32, BTreeSet<u32>)> = Vec::new();
    for r in results {
        if seen_docs.insert(r.id) {
            groups.push((r.id, BTreeSet::new()));
        }
        groups.iter_mut().find(|(id, _)| *id == r.id).unwrap().1.insert(r.chunk_id);
    }

    let mut blocks = Vec::new();
    let mut current_tokens = 0u32;

    for (doc_id, chunk_ids) in groups {
        if current_tokens >= max_tokens {
            break;
        }
        let Some(doc) = resolve(doc_id) else { continue };

        let window_ids = chunks_for_ids(&chunk_ids, doc_id, WINDOW_SIZE);
        let selected_chunks: Vec<_> = window_ids
            .iter()
            .filter_map(|&cid| doc.chunk_by_chunk_id(cid))
            .cloned()
            .collect();

        let remaining = max_tokens.saturating_sub(current_tokens);
        let Some(truncated) = truncate::truncate(&selected_chunks, remaining) else {
            continue;
        };

        let header = format!("# Original Document Title: {}\n* Original Document ID: {}", doc.title, doc.id);
        let header_tokens = crate::token::estimate(&header);

        current_tokens += header_tokens + truncated.tokens_used;
        blocks.push(format!("{header}\n\n{}", truncated.text));

        if current_tokens >= max_tokens {
            break;
        }
    }

    blocks.join("\n\n")
}

/// Converts external `chunkId`s to a document-relative window of indices
/// (spec §4.9 `chunksForIds`).
///
/// Single-index inputs expand to `[max(0, i-w), min(last, i+w)]`. Multiple
/// indices are grouped into runs where successive members differ by `<=
/// 2w+1`, and each run expands the same way; results are flattened,
/// deduped, and sorted ascending.
#[must_use]
fn chunks_for_ids(chunk_ids: &BTreeSet<u32>, doc_id: u32, window: u32) -> Vec<u32> {
    let base = doc_id * 1000;
    let mut indices: Vec<u32> = chunk_ids
        .iter()
        .filter(|&&cid| cid >= base)
        .map(|&cid| cid - base)
        .collect();
    indices.sort_unstable();
    indices.dedup();

    if indices.is_empty() {
        return Vec::new();
    }

    if indices.len() == 1 {
        let i = indices[0];
        return (i.saturating_sub(window)..=(i + window)).map(|idx| base + idx).collect();
    }

    let mut runs: Vec<Vec<u32>> = Vec::new();
    let mut current_run = vec![indices[0]];
    for &idx in &indices[1..] {
        if idx - current_run.last().copied().unwrap_or(idx) <= 2 * window + 1 {
            current_run.push(idx);
        } else {
            runs.push(std::mem::take(&mut current_run));
            current_run.push(idx);
        }
    }
    runs.push(current_run);

    let mut expanded: BTreeSet<u32> = BTreeSet::new();
    for run in runs {
        let lo = run.iter().min().copied().unwrap_or(0).saturating_sub(window);
        let hi = run.iter().max().copied().unwrap_or(0) + window;
        for idx in lo..=hi {
            expanded.insert(base + idx);
        }
    }
    expanded.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, DocumentChunk};

    fn chunk(id: u32, chunk_id: u32, text: &str) -> DocumentChunk {
        DocumentChunk {
            id,
            chunk_id,
            origin_title: "Title".into(),
            text: text.to_string(),
            raw_text: text.to_string(),
            word_count: text.split_whitespace().count() as u32,
            estimated_tokens: crate::token::estimate(text),
            header_stack: vec![],
        }
    }

    fn document(id: u32, chunk_count: usize) -> Document {
        Document {
            id,
            version: None,
            category: Category::Guides,
            title: format!("Doc {id}"),
            link: "https://example.com".into(),
            keywords: BTreeSet::new(),
            chunks: (0..chunk_count)
                .map(|i| chunk(id, id * 1000 + i as u32, &format!("chunk body number {i} with enough words to matter")))
                .collect(),
        }
    }

    fn document_with_text(id: u32, text: &str) -> Document {
        Document {
            id,
            version: None,
            category: Category::Guides,
            title: format!("Doc {id}"),
            link: "https://example.com".into(),
            keywords: BTreeSet::new(),
            chunks: vec![chunk(id, id * 1000, text)],
        }
    }

    #[test]
    fn single_index_expands_symmetrically() {
        let ids = BTreeSet::from([1005u32]);
        let result = chunks_for_ids(&ids, 1, 1);
        assert_eq!(result, vec![1004, 1005, 1006]);
    }

    #[test]
    fn single_index_at_zero_does_not_underflow() {
        let ids = BTreeSet::from([1000u32]);
        let result = chunks_for_ids(&ids, 1, 1);
        assert_eq!(result, vec![1000, 1001]);
    }

    #[test]
    fn nearby_indices_merge_into_one_run() {
        let ids = BTreeSet::from([1002u32, 1004u32]);
        let result = chunks_for_ids(&ids, 1, 1);
        assert_eq!(result, vec![1001, 1002, 1003, 1004, 1005]);
    }

    #[test]
    fn distant_indices_form_separate_runs() {
        let ids = BTreeSet::from([1000u32, 1010u32]);
        let result = chunks_for_ids(&ids, 1, 1);
        assert_eq!(result, vec![1000, 1001, 1009, 1010, 1011]);
    }

    #[test]
    fn normalize_prepends_document_header_and_respects_max_tokens() {
        let doc = document(3, 2);
        let results = vec![
            SearchResult { id: 3, chunk_id: 3000, score: 5.0 },
        ];
        let output = normalize(&results, 5000, |id| if id == 3 { Some(doc.clone()) } else { None });
        assert!(output.contains("Original Document Title: Doc 3"));
        assert!(output.contains("Original Document ID: 3"));
    }

    #[test]
    fn normalize_stops_once_current_tokens_reaches_max_tokens() {
        let doc_a = document_with_text(0, "hi");
        let doc_b = document_with_text(1, "yo");
        let header_a = format!("# Original Document Title: {}\n* Original Document ID: {}", doc_a.title, doc_a.id);
        let group_a_cost = crate::token::estimate(&header_a) + crate::token::estimate("hi");

        let results = vec![
            SearchResult { id: 0, chunk_id: 0, score: 10.0 },
            SearchResult { id: 1, chunk_id: 1000, score: 9.0 },
        ];
        let output = normalize(&results, group_a_cost, |id| match id {
            0 => Some(doc_a.clone()),
            1 => Some(doc_b.clone()),
            _ => None,
        });

        assert!(output.contains("Doc 0"));
        assert!(!output.contains("Doc 1"));
    }

    #[test]
    fn normalize_drops_a_group_too_small_to_partially_cut() {
        let doc_a = document(0, 1);
        let doc_b = document(1, 1);
        let results = vec![
            SearchResult { id: 0, chunk_id: 0, score: 10.0 },
            SearchResult { id: 1, chunk_id: 1000, score: 9.0 },
        ];
        let output = normalize(&results, 1, |id| match id {
            0 => Some(doc_a.clone()),
            1 => Some(doc_b.clone()),
            _ => None,
        });
        assert_eq!(output, "");
    }

    #[test]
    fn unresolvable_document_group_is_skipped() {
        let results = vec![SearchResult { id: 99, chunk_id: 99000, score: 1.0 }];
        let output = normalize(&results, 5000, |_| None);
        assert!(output.is_empty());
    }

    #[test]
    fn empty_results_produce_empty_output() {
        let output = normalize(&[], 5000, |_| None);
        assert_eq!(output, "");
    }
}
