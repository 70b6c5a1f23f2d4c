//! Smart truncation at semantic boundaries (spec §4.10).
//!
//! Used by the assembler to fit a document's selected chunks under a
//! remaining token budget without cutting mid-sentence when a clean
//! boundary is available nearby.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::token;
use crate::types::DocumentChunk;

/// Minimum remaining budget required to attempt a partial cut at all;
/// below this, a non-fitting chunk is simply dropped.
const MIN_PARTIAL_CUT_TOKENS: u32 = 100;

const TRUNCATION_SENTINEL: &str = "\n\n... (there is more content...)";

static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\n").expect("valid regex"));
static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").expect("valid regex"));
static LIST_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n-\s+").expect("valid regex"));
static FENCED_CODE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```.*?```\n?").expect("valid regex"));

/// Result of a truncation pass: the assembled text and its total estimated
/// token cost (including the sentinel, if one was appended).
pub struct Truncated {
    /// Selected raw text, joined by `\n\n`, with the sentinel appended if
    /// any input chunk was omitted or partially cut.
    pub text: String,
    /// Total estimated tokens of `text`.
    pub tokens_used: u32,
}

/// Greedily accumulates whole chunks under `remaining_tokens`, then
/// attempts one partial cut of the first chunk that doesn't fit.
///
/// Returns `None` if `remaining_tokens` is 0 or `chunks` is empty.
#[must_use]
pub fn truncate(chunks: &[DocumentChunk], remaining_tokens: u32) -> Option<Truncated> {
    if remaining_tokens == 0 || chunks.is_empty() {
        return None;
    }

    let mut remaining = remaining_tokens;
    let mut selected_pieces: Vec<String> = Vec::new();
    let mut fully_included = 0usize;

    for chunk in chunks {
        if chunk.estimated_tokens <= remaining {
            remaining -= chunk.estimated_tokens;
            selected_pieces.push(chunk.raw_text.clone());
            fully_included += 1;
        } else {
            if remaining >= MIN_PARTIAL_CUT_TOKENS {
                if let Some(prefix) = partial_cut(&chunk.raw_text, remaining) {
                    remaining -= token::estimate(&prefix);
                    selected_pieces.push(prefix);
                }
            }
            break;
        }
    }

    if selected_pieces.is_empty() {
        return None;
    }

    let omitted = fully_included < chunks.len() || selected_pieces.len() > fully_included;
    let mut text = selected_pieces.join("\n\n");
    let mut tokens_used = remaining_tokens - remaining;

    if omitted {
        text.push_str(TRUNCATION_SENTINEL);
        tokens_used += token::estimate(TRUNCATION_SENTINEL);
    }

    Some(Truncated { text, tokens_used })
}

/// Finds the largest prefix of `text` ending on a semantic boundary whose
/// estimated token cost is `<= remaining`.
fn partial_cut(text: &str, remaining: u32) -> Option<String> {
    let mut boundaries: Vec<usize> = Vec::new();
    boundaries.extend(PARAGRAPH_BREAK.find_iter(text).map(|m| m.end()));
    boundaries.extend(SENTENCE_END.find_iter(text).map(|m| m.end()));
    boundaries.extend(LIST_MARKER.find_iter(text).map(|m| m.end()));
    boundaries.extend(FENCED_CODE_END.find_iter(text).map(|m| m.end()));
    boundaries.sort_unstable();
    boundaries.dedup();

    for &boundary in boundaries.iter().rev() {
        let prefix = &text[..boundary];
        if token::estimate(prefix) <= remaining {
            return Some(prefix.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(raw_text: &str) -> DocumentChunk {
        DocumentChunk {
            id: 0,
            chunk_id: 0,
            origin_title: "Title".into(),
            text: raw_text.to_string(),
            raw_text: raw_text.to_string(),
            word_count: raw_text.split_whitespace().count() as u32,
            estimated_tokens: token::estimate(raw_text),
            header_stack: vec![],
        }
    }

    #[test]
    fn no_tokens_or_no_chunks_returns_none() {
        assert!(truncate(&[], 1000).is_none());
        assert!(truncate(&[chunk("hello")], 0).is_none());
    }

    #[test]
    fn all_chunks_fit_with_no_sentinel() {
        let chunks = vec![chunk("first chunk"), chunk("second chunk")];
        let budget = token::estimate("first chunk") + token::estimate("second chunk") + 10;
        let result = truncate(&chunks, budget).unwrap();
        assert_eq!(result.text, "first chunk\n\nsecond chunk");
        assert!(!result.text.contains("more content"));
    }

    #[test]
    fn sentinel_appears_iff_a_chunk_was_omitted_or_cut() {
        let small = chunk("small");
        let huge = chunk(&"word ".repeat(500));
        let budget = small.estimated_tokens + 10;
        let result = truncate(&[small, huge], budget).unwrap();
        assert!(result.text.ends_with("... (there is more content...)"));
    }

    #[test]
    fn truncation_sentinel_matches_concrete_scenario() {
        let a = chunk("alpha content here");
        let b = chunk("beta content here too");
        let c = chunk(&"gamma overflow text ".repeat(200));
        let budget = a.estimated_tokens + b.estimated_tokens + 5;
        let result = truncate(&[a, b, c], budget).unwrap();
        assert!(result.text.starts_with("alpha content here\n\nbeta content here too"));
        assert!(result.text.ends_with("\n\n... (there is more content...)"));
    }

    #[test]
    fn partial_cut_prefers_a_paragraph_boundary() {
        let text = "First paragraph of reasonable length here.\n\nSecond paragraph that would overflow the remaining budget by quite a lot of extra padding words to push it over.";
        let whole = chunk(text);
        let budget = token::estimate("First paragraph of reasonable length here.") + 5;
        let result = truncate(&[whole], budget).unwrap();
        assert!(result.text.starts_with("First paragraph of reasonable length here."));
        assert!(result.text.contains("more content"));
    }

    #[test]
    fn below_minimum_partial_cut_budget_drops_the_chunk_entirely() {
        let a = chunk(&"word ".repeat(10));
        let b = chunk(&"other word ".repeat(500));
        let budget = a.estimated_tokens + 50;
        let result = truncate(&[a, b], budget).unwrap();
        assert!(result.text.ends_with("more content...)"));
    }
}
