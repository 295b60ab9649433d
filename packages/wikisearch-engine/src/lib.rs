//! The search pipeline over a SphinxQL daemon and a relational content
//! store: query construction, result merging, excerpts, score
//! normalization, facets, and index lifecycle.

mod error;
mod excerpt;
mod index;
mod merge;
mod meta;
mod query;
mod request;
mod search;

pub use error::{Error, Result};
pub use index::BuildReport;
pub use merge::{MatchResult, ScoredRow};
pub use meta::{KeywordStats, QueryStats};
pub use request::{SearchRequest, SortField, SortOrder};
pub use search::SearchResults;

use wikisearch_config::{Config, Excerpts, FieldWeights, Ranking, Search};
use wikisearch_sphinxql::{LastError, SphinxClient};
use wikisearch_store::db::Db;

/// Spelling-suggestion collaborator. The engine consults it once per search
/// and otherwise knows nothing about how suggestions are produced.
pub trait SuggestProvider
where
	Self: Send + Sync,
{
	fn suggest(&self, term: &str) -> Option<String>;
}

/// Default collaborator when no spelling backend is wired in.
pub struct NoSuggest;
impl SuggestProvider for NoSuggest {
	fn suggest(&self, _term: &str) -> Option<String> {
		None
	}
}

/// One search engine instance: a single daemon connection plus the content
/// store pool. The connection cannot interleave queries from two logical
/// requests, so each concurrent request sequence needs its own engine.
pub struct Engine {
	index: String,
	weights: FieldWeights,
	excerpts: Excerpts,
	search: Search,
	ranking: Ranking,
	sphinx: SphinxClient,
	store: Db,
	suggester: Option<Box<dyn SuggestProvider>>,
}

impl Engine {
	pub fn new(cfg: &Config, store: Db) -> Self {
		Self {
			index: cfg.sphinx.index.clone(),
			weights: cfg.weights,
			excerpts: cfg.excerpts.clone(),
			search: cfg.search,
			ranking: cfg.ranking,
			sphinx: SphinxClient::new(cfg.sphinx.clone()),
			store,
			suggester: None,
		}
	}

	pub fn with_suggester(mut self, suggester: Box<dyn SuggestProvider>) -> Self {
		self.suggester = Some(suggester);

		self
	}

	/// Structured detail of the most recent daemon failure, for edge layers
	/// that degrade to an error message instead of propagating.
	pub fn last_sphinx_error(&self) -> Option<&LastError> {
		self.sphinx.last_error()
	}

	pub fn store(&self) -> &Db {
		&self.store
	}
}
