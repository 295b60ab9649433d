//! Merging daemon matches with content-store rows.

use std::collections::HashMap;

use wikisearch_domain::ranking;
use wikisearch_store::models::PageRecord;

/// One match as returned by the daemon, in relevance order.
#[derive(Debug, Clone, Copy)]
pub struct MatchResult {
	pub id: u64,
	/// Raw relevance weight. Absent only if the daemon omitted the weight
	/// column, which leaves the normalized score undefined.
	pub weight: Option<u64>,
}

/// A match joined with its full content-store row, in relevance order.
#[derive(Debug, Clone)]
pub struct ScoredRow {
	pub page: PageRecord,
	pub weight: Option<u64>,
	/// Raw weight divided by the request's theoretical maximum, in `[0, 1]`.
	pub score: Option<f64>,
	pub excerpt: String,
}

/// Re-indexes store rows into the daemon's match order, annotating each with
/// its normalized score. Matches whose row is missing from the store (a race
/// with a delete) are dropped.
pub(crate) fn reorder(
	matches: &[MatchResult],
	rows: Vec<PageRecord>,
	max_score: f64,
) -> Vec<ScoredRow> {
	let mut by_id: HashMap<u64, PageRecord> =
		rows.into_iter().map(|row| (row.page_id, row)).collect();
	let mut out = Vec::with_capacity(matches.len());

	for matched in matches {
		let Some(page) = by_id.remove(&matched.id) else {
			tracing::debug!(
				page_id = matched.id,
				"Matched document is gone from the content store; dropping the row."
			);

			continue;
		};
		let score = matched.weight.and_then(|weight| ranking::normalize(weight, max_score));

		out.push(ScoredRow { page, weight: matched.weight, score, excerpt: String::new() });
	}

	out
}

#[cfg(test)]
mod tests {
	use time::OffsetDateTime;

	use wikisearch_store::models::PageRecord;

	use super::{MatchResult, reorder};

	fn page(id: u64) -> PageRecord {
		PageRecord {
			page_id: id,
			namespace: 0,
			title: format!("Page {id}"),
			text: String::new(),
			categories: Vec::new(),
			created: OffsetDateTime::UNIX_EPOCH,
			touched: OffsetDateTime::UNIX_EPOCH,
		}
	}

	fn matched(id: u64, weight: u64) -> MatchResult {
		MatchResult { id, weight: Some(weight) }
	}

	#[test]
	fn match_order_wins_over_store_order() {
		let matches = [matched(7, 100), matched(3, 50), matched(9, 75)];
		// The store returns rows in its own incidental order.
		let rows = vec![page(3), page(9), page(7)];
		let merged = reorder(&matches, rows, 1_000.0);
		let ids: Vec<u64> = merged.iter().map(|row| row.page.page_id).collect();

		assert_eq!(ids, vec![7, 3, 9]);
	}

	#[test]
	fn missing_store_rows_are_dropped_not_fatal() {
		let matches = [matched(1, 10), matched(2, 20), matched(3, 30)];
		let merged = reorder(&matches, vec![page(1), page(3)], 1_000.0);
		let ids: Vec<u64> = merged.iter().map(|row| row.page.page_id).collect();

		assert_eq!(ids, vec![1, 3]);
	}

	#[test]
	fn scores_are_normalized_against_the_maximum() {
		let merged = reorder(&[matched(1, 500)], vec![page(1)], 1_000.0);

		assert_eq!(merged[0].score, Some(0.5));
		assert_eq!(merged[0].weight, Some(500));
	}

	#[test]
	fn missing_weight_leaves_score_undefined() {
		let merged = reorder(&[MatchResult { id: 1, weight: None }], vec![page(1)], 1_000.0);

		assert_eq!(merged[0].score, None);
	}

	#[test]
	fn zero_matches_produce_an_empty_collection() {
		assert!(reorder(&[], Vec::new(), 1_000.0).is_empty());
	}
}
