use serde::{Deserialize, Serialize};

/// One search invocation, owned by the calling edge layer and passed by
/// value into the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
	pub term: String,
	/// Namespace filter; empty means unrestricted.
	#[serde(default)]
	pub namespaces: Vec<i64>,
	/// Category filter; empty means unrestricted. An empty string selects
	/// documents without any category.
	#[serde(default)]
	pub categories: Vec<String>,
	#[serde(default)]
	pub sort: SortField,
	#[serde(default)]
	pub order: SortOrder,
	#[serde(default)]
	pub offset: u64,
	/// Page size; `0` means "use the configured default".
	#[serde(default)]
	pub limit: u64,
}

impl SearchRequest {
	pub fn new(term: impl Into<String>) -> Self {
		Self {
			term: term.into(),
			namespaces: Vec::new(),
			categories: Vec::new(),
			sort: SortField::default(),
			order: SortOrder::default(),
			offset: 0,
			limit: 0,
		}
	}

	/// Clamps the page to the configured bounds. After this, `limit` is
	/// always positive.
	pub(crate) fn normalized(mut self, search: &wikisearch_config::Search) -> Self {
		if self.limit == 0 {
			self.limit = search.per_page;
		}

		self.limit = self.limit.min(search.max_limit);

		self
	}

	/// 1-based page implied by the offset. Call after normalization.
	pub(crate) fn current_page(&self) -> u64 {
		self.offset / self.limit.max(1) + 1
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
	#[default]
	Relevance,
	DateCreated,
	DateModified,
}

impl SortField {
	/// Parses an edge-supplied sort name; anything unknown falls back to
	/// relevance.
	pub fn parse(raw: &str) -> Self {
		match raw {
			"date_created" => Self::DateCreated,
			"date_modified" => Self::DateModified,
			_ => Self::Relevance,
		}
	}

	pub(crate) fn column(self) -> &'static str {
		match self {
			Self::Relevance => "w",
			Self::DateCreated => "date_insert",
			Self::DateModified => "date_touched",
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
	Asc,
	#[default]
	Desc,
}

impl SortOrder {
	pub(crate) fn keyword(self) -> &'static str {
		match self {
			Self::Asc => "ASC",
			Self::Desc => "DESC",
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{SearchRequest, SortField, SortOrder};

	fn search_cfg() -> wikisearch_config::Search {
		wikisearch_config::Search {
			per_page: 20,
			max_limit: 100,
			display_pages: 30,
			facets: true,
			max_facets: 100,
		}
	}

	#[test]
	fn zero_limit_takes_the_configured_default() {
		let req = SearchRequest::new("term").normalized(&search_cfg());

		assert_eq!(req.limit, 20);
	}

	#[test]
	fn oversized_limit_is_clamped() {
		let mut req = SearchRequest::new("term");

		req.limit = 10_000;

		assert_eq!(req.normalized(&search_cfg()).limit, 100);
	}

	#[test]
	fn current_page_derives_from_offset() {
		let mut req = SearchRequest::new("term").normalized(&search_cfg());

		assert_eq!(req.current_page(), 1);

		req.offset = 40;

		assert_eq!(req.current_page(), 3);
	}

	#[test]
	fn unknown_sort_field_falls_back_to_relevance() {
		assert_eq!(SortField::parse("date_modified"), SortField::DateModified);
		assert_eq!(SortField::parse("date_created"), SortField::DateCreated);
		assert_eq!(SortField::parse("shoe_size"), SortField::Relevance);
		assert_eq!(SortField::parse(""), SortField::Relevance);
	}

	#[test]
	fn default_sort_is_relevance_descending() {
		let req = SearchRequest::new("term");

		assert_eq!(req.sort, SortField::Relevance);
		assert_eq!(req.order, SortOrder::Desc);
	}
}
