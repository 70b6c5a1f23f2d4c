//! Category reweighter (spec §4.7).
//!
//! A scalar post-BM25 multiplier reflecting editorial priority of a
//! document's category, followed by a re-sort. Deliberately separate from
//! [`crate::bm25`] so the ranker stays a pure relevance function and this
//! stays a pure business-priority function.

use crate::types::{Category, SearchResult};

/// Multiplies each result's score by its owning document's category
/// weight, then re-sorts descending by score (spec §4.7 concrete scenario
/// 5: `{10 blog, 9 guides, 8 reference}` -> `{7.0, 10.8, 8.0}` -> guides >
/// reference > blog).
#[must_use]
pub fn reweight(results: Vec<SearchResult>, category_of: impl Fn(u32) -> Category) -> Vec<SearchResult> {
    let mut reweighted: Vec<SearchResult> = results
        .into_iter()
        .map(|r| SearchResult {
            score: r.score * category_of(r.id).weight(),
            ..r
        })
        .collect();

    reweighted.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.chunk_id.cmp(&b.chunk_id))
    });
    reweighted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: u32, chunk_id: u32, score: f32) -> SearchResult {
        SearchResult { id, chunk_id, score }
    }

    #[test]
    fn category_weights_reorder_results_per_concrete_scenario() {
        let results = vec![
            result(0, 0, 10.0),    // blog, weight 0.7 -> 7.0
            result(1, 1000, 9.0),  // guides, weight 1.2 -> 10.8
            result(2, 2000, 8.0),  // reference, weight 1.0 -> 8.0
        ];
        let categories = [Category::Blog, Category::Guides, Category::Reference];
        let reweighted = reweight(results, |id| categories[id as usize]);

        assert_eq!(reweighted[0].id, 1);
        assert!((reweighted[0].score - 10.8).abs() < 1e-4);
        assert_eq!(reweighted[1].id, 2);
        assert!((reweighted[1].score - 8.0).abs() < 1e-4);
        assert_eq!(reweighted[2].id, 0);
        assert!((reweighted[2].score - 7.0).abs() < 1e-4);
    }

    #[test]
    fn unknown_category_is_weight_neutral() {
        let results = vec![result(0, 0, 5.0)];
        let reweighted = reweight(results, |_| Category::Unknown);
        assert!((reweighted[0].score - 5.0).abs() < 1e-4);
    }

    #[test]
    fn empty_input_produces_empty_output() {
        assert!(reweight(vec![], |_| Category::Unknown).is_empty());
    }
}
