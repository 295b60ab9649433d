//! Relevance normalization.
//!
//! The daemon's ranking expression is `sum(lcs*user_weight)*1000 + bm25*decay`
//! where `lcs` per keyword-in-field match is at most the keyword count, `bm25`
//! stays below 1000, and `decay` is a half-life over the document's touched
//! timestamp (so the BM25 component favors recently edited documents without
//! ever lifting the ceiling). The theoretical maximum is therefore a pure
//! function of the term and the configured field weights, computed once per
//! request and shared across all row normalizations.

use wikisearch_config::FieldWeights;

use crate::query::keyword_count;

/// Upper bound of the BM25 component of the ranking expression.
pub const BM25_CEILING: f64 = 999.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// The highest score the ranking expression can assign for `term` under
/// `weights`, with `selected_categories` synthetic category keywords in the
/// predicate.
pub fn max_score(term: &str, weights: &FieldWeights, selected_categories: usize) -> f64 {
	let k = keyword_count(term) as f64;
	let mut max = k * weights.sum() as f64 * 1000.0 + BM25_CEILING;

	if selected_categories > 0 {
		max += weights.category as f64 * selected_categories as f64;
	}

	max
}

/// Maps a raw relevance weight into `[0, 1]` against a request's maximum.
/// Not applicable (`None`) when the maximum is not positive.
pub fn normalize(weight: u64, max: f64) -> Option<f64> {
	if max <= 0.0 {
		return None;
	}

	Some((weight as f64 / max).min(1.0))
}

/// The ranking expression handed to the daemon via `OPTION ranker=expr(...)`.
pub fn ranker_expr(recency_half_life_days: f64) -> String {
	let half_life_secs = (recency_half_life_days * SECONDS_PER_DAY).round() as i64;

	format!(
		"sum(lcs*user_weight)*1000 + bm25*pow(0.5, max(now()-date_touched, 0)/{half_life_secs}.0)"
	)
}
