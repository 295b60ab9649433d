//! Highlighted excerpts via the daemon's snippet facility.
//!
//! One synchronous round trip per row; the snippet request carries control
//! byte markers which the renderer substitutes for the configured markup
//! after escaping everything else.

use sqlx::Row;

use wikisearch_config::Excerpts;
use wikisearch_domain::snippet;
use wikisearch_sphinxql::{Bind, SphinxClient};

use crate::merge::ScoredRow;

const SNIPPET_QUERY: &str = "\
CALL SNIPPETS(?, ?, ?, \
? AS before_match, ? AS after_match, ? AS chunk_separator, ? AS limit, ? AS around)";

pub(crate) async fn attach_excerpts(
	sphinx: &mut SphinxClient,
	index: &str,
	term: &str,
	excerpts: &Excerpts,
	rows: &mut [ScoredRow],
) {
	for row in rows.iter_mut() {
		row.excerpt = build_one(sphinx, index, term, excerpts, &row.page.text).await;
	}
}

async fn build_one(
	sphinx: &mut SphinxClient,
	index: &str,
	term: &str,
	excerpts: &Excerpts,
	body: &str,
) -> String {
	let binds = [
		Bind::from(body),
		Bind::from(index),
		Bind::from(term),
		Bind::from(snippet::BEFORE_MATCH_MARKER),
		Bind::from(snippet::AFTER_MATCH_MARKER),
		Bind::from(excerpts.chunk_separator.as_str()),
		Bind::from(excerpts.limit),
		Bind::from(excerpts.around),
	];

	match sphinx.select(SNIPPET_QUERY, &binds).await {
		Ok(rows) => {
			let mut parts = Vec::with_capacity(rows.len());

			for row in &rows {
				if let Ok(part) = row.try_get::<String, _>(0) {
					parts.push(part);
				}
			}

			snippet::render(&parts.join("\n"), excerpts)
		},
		// A failed snippet never drops the row; show the failure instead.
		Err(err) => snippet::render_error(&err.to_string()),
	}
}
