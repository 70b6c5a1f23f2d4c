//! Synonym expansion dictionary (spec §4.8).
//!
//! A small, static term → replacement-terms table. Lookup normalizes
//! non-Korean terms by lowercasing and trimming; Korean terms are used
//! as-is since case folding does not apply to Hangul.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Static term → replacement terms table.
///
/// Entries are intentionally small and documentation-domain-specific; this
/// is not meant to be a general thesaurus.
static DICTIONARY: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    HashMap::from([
        ("auth", ["authentication", "authorization"].as_slice()),
        ("authn", ["authentication"].as_slice()),
        ("authz", ["authorization"].as_slice()),
        ("config", ["configuration", "settings"].as_slice()),
        ("env", ["environment"].as_slice()),
        ("func", ["function"].as_slice()),
        ("init", ["initialize", "initialization"].as_slice()),
        ("js", ["javascript"].as_slice()),
        ("ts", ["typescript"].as_slice()),
        ("repo", ["repository"].as_slice()),
        ("db", ["database"].as_slice()),
        ("api", ["interface", "endpoint"].as_slice()),
        ("llm", ["large language model", "model"].as_slice()),
        ("sdk", ["software development kit"].as_slice()),
        ("cfg", ["configuration"].as_slice()),
    ])
});

/// Returns `true` for any codepoint in the Hangul ranges `token.rs` treats
/// as Korean text.
fn has_korean(term: &str) -> bool {
    term.chars().any(|c| {
        matches!(c as u32,
            0x1100..=0x11FF | 0x3130..=0x318F | 0xA960..=0xA97F
            | 0xAC00..=0xD7A3 | 0xD7B0..=0xD7FF
        )
    })
}

fn normalize(term: &str) -> String {
    if has_korean(term) {
        term.to_string()
    } else {
        term.trim().to_lowercase()
    }
}

/// Looks up `term`'s replacement terms, if the dictionary has an entry for
/// it (after normalization); otherwise returns `None`.
#[must_use]
pub fn lookup(term: &str) -> Option<Vec<String>> {
    let key = normalize(term);
    DICTIONARY
        .get(key.as_str())
        .map(|replacements| replacements.iter().map(|s| (*s).to_string()).collect())
}

/// Expands each term in `terms` to its dictionary replacements, or to the
/// term itself when it has none. Ordering is preserved and concatenation
/// does not deduplicate, matching spec §4.8.
#[must_use]
pub fn convert(terms: &[String]) -> Vec<String> {
    terms
        .iter()
        .flat_map(|term| lookup(term).unwrap_or_else(|| vec![term.clone()]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_term_returns_itself() {
        let result = convert(&["xyzzy".to_string()]);
        assert_eq!(result, vec!["xyzzy".to_string()]);
    }

    #[test]
    fn known_term_expands_to_replacements() {
        let result = convert(&["auth".to_string()]);
        assert_eq!(result, vec!["authentication".to_string(), "authorization".to_string()]);
    }

    #[test]
    fn lookup_normalizes_case_and_whitespace() {
        assert_eq!(lookup("  AUTH "), lookup("auth"));
    }

    #[test]
    fn convert_preserves_ordering_without_deduplication() {
        let result = convert(&["auth".to_string(), "xyzzy".to_string(), "auth".to_string()]);
        assert_eq!(
            result,
            vec![
                "authentication".to_string(),
                "authorization".to_string(),
                "xyzzy".to_string(),
                "authentication".to_string(),
                "authorization".to_string(),
            ]
        );
    }

    proptest::proptest! {
        #[test]
        fn terms_outside_the_dictionary_expand_to_themselves(term in "[a-zA-Z]{4,12}") {
            proptest::prop_assume!(lookup(&term).is_none());
            let result = convert(&[term.clone()]);
            proptest::prop_assert_eq!(result, vec![term]);
        }
    }
}
