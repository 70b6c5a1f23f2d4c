//! Heuristic token-cost estimation (spec §4.1).
//!
//! A dependency-free stand-in for a real tokenizer, used pervasively to
//! meter output against a caller's token budget. Deterministic and
//! side-effect free by construction: every adjustment is a pure function of
//! the input text.

use once_cell::sync::Lazy;
use regex::Regex;

static FENCED_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)```.*?```").expect("valid regex"));
static INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`[^`\n]+`").expect("valid regex"));
static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").expect("valid regex"));
static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#{1,6}\s+.+$").expect("valid regex"));

const CHAR_COST: f64 = 0.75;
const KOREAN_BONUS: f64 = 0.8;
const FENCED_CODE_RATE: f64 = 0.3;
const INLINE_CODE_RATE: f64 = 0.4;
const HEADER_BONUS: f64 = 2.0;
const URL_MIN_TOKENS: f64 = 8.0;

/// Returns `true` for code points in the Hangul syllable or jamo ranges.
fn is_hangul(ch: char) -> bool {
    matches!(ch as u32,
        0x1100..=0x11FF   // Hangul Jamo
        | 0x3130..=0x318F // Hangul Compatibility Jamo
        | 0xA960..=0xA97F // Hangul Jamo Extended-A
        | 0xAC00..=0xD7A3 // Hangul Syllables
        | 0xD7B0..=0xD7FF // Hangul Jamo Extended-B
    )
}

/// Estimates the token cost of `text`.
///
/// Empty or whitespace-only input costs 0. Otherwise the estimate is a base
/// character cost plus additive adjustments for Korean text, fenced/inline
/// code, URLs, and markdown headers, rounded up to at least 1.
#[must_use]
pub fn estimate(text: &str) -> u32 {
    if text.is_empty() {
        return 0;
    }

    let char_count = text.chars().count() as f64;
    let mut total = char_count * CHAR_COST;

    let korean_count = text.chars().filter(|&c| is_hangul(c)).count() as f64;
    total += korean_count * KOREAN_BONUS;

    for m in FENCED_CODE.find_iter(text) {
        let len = m.as_str().chars().count() as f64;
        total += len * FENCED_CODE_RATE - len * CHAR_COST;
    }

    let without_fenced = FENCED_CODE.replace_all(text, "");
    for m in INLINE_CODE.find_iter(&without_fenced) {
        let len = m.as_str().chars().count() as f64;
        total += len * INLINE_CODE_RATE - len * CHAR_COST;
    }

    for m in URL_RE.find_iter(text) {
        let len = m.as_str().chars().count() as f64;
        total += (len * CHAR_COST).max(URL_MIN_TOKENS) - len * CHAR_COST;
    }

    total += HEADER_RE.find_iter(text).count() as f64 * HEADER_BONUS;

    total.max(1.0).ceil() as u32
}

/// Sums [`estimate`] over every string in `texts`.
#[must_use]
pub fn estimate_total<'a, I>(texts: I) -> u32
where
    I: IntoIterator<Item = &'a str>,
{
    texts.into_iter().map(estimate).sum()
}

/// Returns `true` if `text`'s estimated cost exceeds `limit`.
#[must_use]
pub fn exceeds_limit(text: &str, limit: u32) -> bool {
    estimate(text) > limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_costs_nothing() {
        assert_eq!(estimate(""), 0);
    }

    #[test]
    fn plain_text_scales_with_char_count() {
        let short = estimate("hi");
        let long = estimate(&"hi ".repeat(100));
        assert!(long > short);
    }

    #[test]
    fn minimum_nonempty_cost_is_one() {
        assert_eq!(estimate("a"), 1);
    }

    #[test]
    fn fenced_code_costs_less_than_plain_text_of_same_length() {
        let code = format!("```\n{}\n```", "x".repeat(200));
        let plain = "x".repeat(code.chars().count());
        assert!(estimate(&code) < estimate(&plain));
    }

    #[test]
    fn urls_are_floored_to_minimum_token_count() {
        let text = "see https://example.com/a for details";
        // Sanity: doesn't panic and produces a positive, finite estimate.
        assert!(estimate(text) > 0);
    }

    #[test]
    fn headers_add_flat_bonus_per_line() {
        let without = estimate("just a paragraph of text here");
        let with_header = estimate("# Heading\n\njust a paragraph of text here");
        assert!(with_header > without);
    }

    #[test]
    fn estimate_total_sums_individual_estimates() {
        let texts = ["abc", "def", ""];
        let total = estimate_total(texts);
        let sum: u32 = texts.iter().map(|t| estimate(t)).sum();
        assert_eq!(total, sum);
    }

    #[test]
    fn exceeds_limit_is_strict_greater_than() {
        let text = "hello world";
        let cost = estimate(text);
        assert!(!exceeds_limit(text, cost));
        assert!(exceeds_limit(text, cost - 1));
    }

    #[test]
    fn korean_text_adds_bonus_over_equivalent_length_ascii() {
        let korean = "안녕하세요";
        let ascii = "a".repeat(korean.chars().count());
        assert!(estimate(korean) > estimate(&ascii));
    }
}
