//! Search query construction.

use wikisearch_config::{FieldWeights, Ranking};
use wikisearch_domain::{category, query as term, ranking};

use crate::request::SearchRequest;

/// A fully built main query: the `MATCH()` predicate (bound client-side)
/// plus the statement text around it.
#[derive(Debug, Clone)]
pub(crate) struct BuiltQuery {
	pub predicate: String,
	/// The filtered free-text part of the predicate, without the synthetic
	/// category group. This is what snippets highlight against.
	pub term: String,
	pub sql: String,
}

/// Builds the main search statement, or `None` when the term is blank and
/// the search must short-circuit to empty results.
pub(crate) fn build_search_query(
	req: &SearchRequest,
	index: &str,
	weights: &FieldWeights,
	ranking_cfg: &Ranking,
) -> Option<BuiltQuery> {
	let filtered = term::filter_term(&req.term);

	if filtered.is_empty() {
		return None;
	}

	let mut predicate = filtered.clone();

	if let Some(group) = category::match_group(&req.categories) {
		predicate.push(' ');
		predicate.push_str(&group);
	}

	let mut sql = format!("SELECT *, WEIGHT() w FROM {index} WHERE MATCH(?)");

	if !req.namespaces.is_empty() {
		let set =
			req.namespaces.iter().map(|ns| ns.to_string()).collect::<Vec<_>>().join(",");

		sql.push_str(&format!(" AND namespace IN ({set})"));
	}

	sql.push_str(&format!(" ORDER BY {} {}", req.sort.column(), req.order.keyword()));
	sql.push_str(&format!(" LIMIT {}, {}", req.offset, req.limit));

	let expr = ranking::ranker_expr(ranking_cfg.recency_half_life_days);

	sql.push_str(&format!(
		" OPTION ranker=expr({}), field_weights=(title={}, body={}, category={})",
		wikisearch_sphinxql::quote_str(&expr),
		weights.title,
		weights.body,
		weights.category
	));

	Some(BuiltQuery { predicate, term: filtered, sql })
}

/// The grouped facet statement run before the main query, over the same
/// predicate.
pub(crate) fn build_facet_query(index: &str, max_facets: u64) -> String {
	format!(
		"SELECT id, category_list FROM {index} WHERE MATCH(?) GROUP BY category_list LIMIT {max_facets}"
	)
}
