//! `SHOW META` parsing.
//!
//! The daemon reports per-query statistics as variable/value string pairs
//! immediately after the main query; they must be read before anything else
//! runs on the connection.

use serde::Serialize;
use sqlx::{Row, mysql::MySqlRow};

use wikisearch_domain::category::NO_CATEGORY_TOKEN;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize)]
pub struct KeywordStats {
	pub keyword: String,
	pub docs: u64,
	pub hits: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryStats {
	/// Matches retrievable through pagination (capped by the daemon).
	pub total: u64,
	/// All matches found.
	pub total_found: u64,
	/// Query time in seconds.
	pub time: f64,
	pub keywords: Vec<KeywordStats>,
}

impl QueryStats {
	/// Assembles stats from `SHOW META` pairs. Synthetic category keywords
	/// are dropped from the per-keyword display when `hide_synthetic` is set
	/// (they are filter plumbing, not user terms).
	pub(crate) fn from_pairs(pairs: &[(String, String)], hide_synthetic: bool) -> Self {
		let lookup = |name: &str| pairs.iter().find(|(key, _)| key == name).map(|(_, v)| v.as_str());
		let parse_u64 = |name: &str| lookup(name).and_then(|v| v.parse().ok()).unwrap_or(0);
		let mut keywords = Vec::new();
		let mut i = 0;

		while let Some(keyword) = lookup(&format!("keyword[{i}]")) {
			let keyword = keyword.to_string();
			let docs = parse_u64(&format!("docs[{i}]"));
			let hits = parse_u64(&format!("hits[{i}]"));

			i += 1;

			if hide_synthetic && is_synthetic_keyword(&keyword) {
				continue;
			}

			keywords.push(KeywordStats { keyword, docs, hits });
		}

		Self {
			total: parse_u64("total"),
			total_found: parse_u64("total_found"),
			time: lookup("time").and_then(|v| v.parse().ok()).unwrap_or(0.0),
			keywords,
		}
	}
}

pub(crate) fn meta_pairs(rows: &[MySqlRow]) -> Result<Vec<(String, String)>> {
	rows.iter()
		.map(|row| {
			let name: String = row.try_get(0).map_err(malformed)?;
			let value: String = row.try_get(1).map_err(malformed)?;

			Ok((name, value))
		})
		.collect()
}

fn malformed(err: sqlx::Error) -> Error {
	Error::Malformed { message: err.to_string() }
}

fn is_synthetic_keyword(keyword: &str) -> bool {
	keyword == NO_CATEGORY_TOKEN || keyword.starts_with("__cat_")
}
