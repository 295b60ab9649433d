use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub sphinx: Sphinx,
	pub store: Store,
	#[serde(default)]
	pub weights: FieldWeights,
	#[serde(default)]
	pub excerpts: Excerpts,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub ranking: Ranking,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

/// Endpoint of the searchd daemon. When `socket` is set it wins over
/// `host`/`port`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Sphinx {
	pub host: String,
	pub port: u16,
	pub socket: Option<PathBuf>,
	pub index: String,
	pub query_timeout_ms: u64,
}
impl Default for Sphinx {
	fn default() -> Self {
		Self {
			host: "localhost".to_string(),
			port: 9306,
			socket: None,
			index: "wiki".to_string(),
			query_timeout_ms: 5_000,
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct Store {
	pub dsn: String,
	pub pool_max_conns: u32,
}

/// Per-field relevance multipliers. Titles dominate body text by default.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
	pub title: u64,
	pub body: u64,
	pub category: u64,
}
impl FieldWeights {
	pub fn sum(&self) -> u64 {
		self.title + self.body + self.category
	}
}
impl Default for FieldWeights {
	fn default() -> Self {
		Self { title: 100, body: 1, category: 20 }
	}
}

/// Final markup substituted for the wire-level match markers, plus the
/// snippet shaping knobs forwarded to `CALL SNIPPETS`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Excerpts {
	pub before_match: String,
	pub after_match: String,
	pub chunk_separator: String,
	pub limit: u32,
	pub around: u32,
}
impl Default for Excerpts {
	fn default() -> Self {
		Self {
			before_match: r#"<span class="searchmatch">"#.to_string(),
			after_match: "</span>".to_string(),
			chunk_separator: " ... ".to_string(),
			limit: 200,
			around: 15,
		}
	}
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Search {
	pub per_page: u64,
	pub max_limit: u64,
	pub display_pages: u64,
	pub facets: bool,
	pub max_facets: u64,
}
impl Default for Search {
	fn default() -> Self {
		Self { per_page: 20, max_limit: 500, display_pages: 30, facets: true, max_facets: 100 }
	}
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Ranking {
	/// Half-life in days of the recency boost applied to the BM25 component
	/// of the ranking expression.
	pub recency_half_life_days: f64,
}
impl Default for Ranking {
	fn default() -> Self {
		Self { recency_half_life_days: 30.0 }
	}
}
