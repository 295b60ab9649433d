//! The search pipeline: facets, main query, meta, merge, excerpts.

use sqlx::{Row, mysql::MySqlRow};

use wikisearch_domain::{PageWindow, category, paging, ranking};
use wikisearch_sphinxql::Bind;
use wikisearch_store::pages;

use crate::{
	Engine, excerpt,
	error::Result,
	merge::{self, MatchResult, ScoredRow},
	meta::{self, QueryStats},
	query,
	request::SearchRequest,
};

#[derive(Debug)]
pub struct SearchResults {
	/// Matched rows in relevance order, excerpts attached.
	pub rows: Vec<ScoredRow>,
	pub stats: QueryStats,
	/// Deduplicated category facets derived from the match set.
	pub facets: Vec<String>,
	pub suggestion: Option<String>,
	pub window: PageWindow,
}

impl SearchResults {
	fn empty() -> Self {
		Self {
			rows: Vec::new(),
			stats: QueryStats::default(),
			facets: Vec::new(),
			suggestion: None,
			window: PageWindow {
				first_page: 1,
				last_page: 1,
				max_page: 1,
				has_prev: false,
				has_next: false,
			},
		}
	}
}

impl Engine {
	/// Runs one full search. The whole pipeline shares this engine's single
	/// daemon connection, so an engine must not be shared across concurrent
	/// requests.
	pub async fn search(&mut self, req: SearchRequest) -> Result<SearchResults> {
		let req = req.normalized(&self.search);
		let Some(built) =
			query::build_search_query(&req, &self.index, &self.weights, &self.ranking)
		else {
			tracing::debug!("Blank search term; skipping the daemon entirely.");

			return Ok(SearchResults::empty());
		};

		// Facets run first: SHOW META reports on the connection's most
		// recent query, which must stay the main one.
		let facets = if self.search.facets {
			self.fetch_facets(&built.predicate).await
		} else {
			Vec::new()
		};
		let main_rows =
			self.sphinx.select(&built.sql, &[Bind::from(built.predicate.as_str())]).await?;
		let matches = matches_from_rows(&main_rows);
		let meta_rows = self.sphinx.select("SHOW META", &[]).await?;
		let stats =
			QueryStats::from_pairs(&meta::meta_pairs(&meta_rows)?, !req.categories.is_empty());
		let window = paging::page_window(
			req.limit,
			req.current_page(),
			stats.total,
			self.search.display_pages,
		)?;
		let max_score = ranking::max_score(&req.term, &self.weights, req.categories.len());
		let ids: Vec<u64> = matches.iter().map(|matched| matched.id).collect();
		let store_rows = pages::pages_by_ids(&self.store, &ids).await?;
		let mut rows = merge::reorder(&matches, store_rows, max_score);

		excerpt::attach_excerpts(
			&mut self.sphinx,
			&self.index,
			&built.term,
			&self.excerpts,
			&mut rows,
		)
		.await;

		let suggestion =
			self.suggester.as_ref().and_then(|suggester| suggester.suggest(&req.term));

		Ok(SearchResults { rows, stats, facets, suggestion, window })
	}

	async fn fetch_facets(&mut self, predicate: &str) -> Vec<String> {
		let sql = query::build_facet_query(&self.index, self.search.max_facets);

		match self.sphinx.select(&sql, &[Bind::from(predicate)]).await {
			Ok(rows) => {
				let lists: Vec<String> = rows
					.iter()
					.filter_map(|row| row.try_get::<String, _>("category_list").ok())
					.collect();

				category::dedupe_category_lists(lists.iter().map(String::as_str))
			},
			Err(err) => {
				tracing::warn!(error = %err, "Facet query failed; continuing without facets.");

				Vec::new()
			},
		}
	}
}

fn matches_from_rows(rows: &[MySqlRow]) -> Vec<MatchResult> {
	let mut out = Vec::with_capacity(rows.len());

	for row in rows {
		let Some(id) = get_u64(row, "id") else {
			tracing::debug!("Dropping a match row without a readable id.");

			continue;
		};

		out.push(MatchResult { id, weight: get_u64(row, "w") });
	}

	out
}

/// The daemon is loose about integer signedness across versions; accept
/// either and refuse negatives.
pub(crate) fn get_u64(row: &MySqlRow, column: &str) -> Option<u64> {
	row.try_get::<u64, _>(column).ok().or_else(|| {
		row.try_get::<i64, _>(column).ok().and_then(|value| u64::try_from(value).ok())
	})
}
