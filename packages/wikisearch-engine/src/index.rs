//! Index lifecycle: per-document updates, full rebuilds, purge of deleted
//! documents, and maintenance statements.

use time::OffsetDateTime;

use wikisearch_domain::category;
use wikisearch_sphinxql::Bind;
use wikisearch_store::{models::PageRecord, pages};

use crate::{Engine, error::Result, search::get_u64};

const SCAN_BATCH: u32 = 256;
const MAX_REPLACE_ROWS: usize = 256;
const MAX_REPLACE_BYTES: usize = 6 * 1024 * 1024;
const PURGE_BATCH: u64 = 1_000;

const INDEX_COLUMNS: &str =
	"(id, namespace, title, body, category, category_list, date_insert, date_touched)";
const ROW_PLACEHOLDERS: &str = "(?, ?, ?, ?, ?, ?, ?, ?)";

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildReport {
	pub pages: u64,
	pub batches: u64,
	pub failed_batches: u64,
}

impl Engine {
	/// Replaces one document in the index after a save. Never propagates a
	/// failure: the host's save path does not depend on search being up.
	pub async fn update(&mut self, id: u64, namespace: i64, title: &str, body: &str) {
		if let Err(err) = self.try_update(id, namespace, title, body).await {
			tracing::warn!(error = %err, page_id = id, "Search index update failed; the save continues.");
		}
	}

	/// Removes one document from the index after a delete. Same degrade-only
	/// policy as [`Self::update`].
	pub async fn delete(&mut self, id: u64, title: &str) {
		let sql = format!("DELETE FROM {} WHERE id=?", self.index);

		if let Err(err) = self.sphinx.execute(&sql, &[Bind::from(id)]).await {
			tracing::warn!(error = %err, page_id = id, title, "Search index delete failed; continuing.");
		}
	}

	/// Rebuilds the whole index from the content store in bounded batches.
	/// Batch failures are logged and skipped; the scan continues.
	pub async fn build_index(&mut self) -> Result<BuildReport> {
		let total = pages::count_pages(&self.store).await?;

		tracing::info!(total, index = %self.index, "Filling the full-text index.");

		let mut report = BuildReport::default();
		let mut last_id = 0;

		loop {
			let batch = pages::scan_pages(&self.store, last_id, SCAN_BATCH).await?;
			let Some(last) = batch.last() else {
				break;
			};

			last_id = last.page_id;

			for chunk in split_batches(&batch) {
				match self.replace_rows(chunk).await {
					Ok(()) => {
						report.pages += chunk.len() as u64;
						report.batches += 1;
					},
					Err(err) => {
						report.failed_batches += 1;
						tracing::error!(error = %err, "Index batch failed; continuing with the next batch.");
					},
				}
			}

			tracing::info!(done = report.pages, total, "Index build progress.");
		}

		Ok(report)
	}

	/// Bootstrap hook: builds the index when it is empty. Returns whether a
	/// build ran.
	pub async fn init_index(&mut self) -> Result<bool> {
		let probe = format!("SELECT id FROM {} LIMIT 1", self.index);
		let rows = self.sphinx.select(&probe, &[]).await?;

		if !rows.is_empty() {
			return Ok(false);
		}

		self.build_index().await?;

		Ok(true)
	}

	/// Pages over indexed ids and removes those no longer present in the
	/// content store. Returns the number of removed documents.
	pub async fn purge_deleted(&mut self) -> Result<u64> {
		let mut removed = 0;
		let mut last_id = 0_u64;

		loop {
			let sql = format!("SELECT id FROM {} WHERE id > ? ORDER BY id ASC LIMIT ?", self.index);
			let rows =
				self.sphinx.select(&sql, &[Bind::from(last_id), Bind::from(PURGE_BATCH)]).await?;
			let ids: Vec<u64> = rows.iter().filter_map(|row| get_u64(row, "id")).collect();
			let Some(last) = ids.last() else {
				break;
			};

			last_id = *last;

			let existing = pages::existing_page_ids(&self.store, &ids).await?;
			let stale: Vec<u64> = ids.iter().copied().filter(|id| !existing.contains(id)).collect();

			if !stale.is_empty() {
				let list =
					stale.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(",");
				let delete = format!("DELETE FROM {} WHERE id IN ({list})", self.index);

				self.sphinx.execute(&delete, &[]).await?;

				removed += stale.len() as u64;
			}
		}

		if removed > 0 {
			tracing::info!(removed, "Purged deleted documents from the index.");
		}

		Ok(removed)
	}

	pub async fn optimize(&mut self) -> Result<()> {
		let sql = format!("OPTIMIZE INDEX {}", self.index);

		self.sphinx.execute(&sql, &[]).await?;

		Ok(())
	}

	/// Daemon counters matching a `SHOW STATUS LIKE` pattern.
	pub async fn status(&mut self, like: &str) -> Result<Vec<(String, String)>> {
		let rows = self.sphinx.select("SHOW STATUS LIKE ?", &[Bind::from(like)]).await?;

		crate::meta::meta_pairs(&rows)
	}

	async fn try_update(&mut self, id: u64, namespace: i64, title: &str, body: &str) -> Result<()> {
		let stored = pages::page_by_id(&self.store, id).await?;
		let now = OffsetDateTime::now_utc();
		let (categories, created, touched) = match stored {
			Some(page) => (page.categories, page.created, page.touched),
			None => (Vec::new(), now, now),
		};
		let sql = format!("REPLACE INTO {} {INDEX_COLUMNS} VALUES {ROW_PLACEHOLDERS}", self.index);
		let binds = [
			Bind::from(id),
			Bind::from(namespace),
			Bind::from(title),
			Bind::from(body),
			Bind::from(category::field_tokens(&categories)),
			Bind::from(category::display_list(&categories)),
			unix(created),
			unix(touched),
		];

		self.sphinx.execute(&sql, &binds).await?;

		Ok(())
	}

	async fn replace_rows(&mut self, chunk: &[PageRecord]) -> Result<()> {
		let values = vec![ROW_PLACEHOLDERS; chunk.len()].join(", ");
		let sql = format!("REPLACE INTO {} {INDEX_COLUMNS} VALUES {values}", self.index);
		let mut binds = Vec::with_capacity(chunk.len() * 8);

		for page in chunk {
			binds.push(Bind::from(page.page_id));
			binds.push(Bind::from(page.namespace));
			binds.push(Bind::from(page.title.as_str()));
			binds.push(Bind::from(page.text.as_str()));
			binds.push(Bind::from(category::field_tokens(&page.categories)));
			binds.push(Bind::from(category::display_list(&page.categories)));
			binds.push(unix(page.created));
			binds.push(unix(page.touched));
		}

		self.sphinx.execute(&sql, &binds).await?;

		Ok(())
	}
}

fn unix(ts: OffsetDateTime) -> Bind {
	Bind::Uint(ts.unix_timestamp().max(0) as u64)
}

/// Splits a scan batch into replace statements bounded by both row count
/// and serialized payload size, whichever caps first.
fn split_batches(batch: &[PageRecord]) -> Vec<&[PageRecord]> {
	let mut out = Vec::new();
	let mut start = 0;
	let mut size = 0;

	for (i, page) in batch.iter().enumerate() {
		let page_size = payload_size(page);
		let rows = i - start;

		if rows > 0 && (rows >= MAX_REPLACE_ROWS || size + page_size > MAX_REPLACE_BYTES) {
			out.push(&batch[start..i]);
			start = i;
			size = 0;
		}

		size += page_size;
	}

	if start < batch.len() {
		out.push(&batch[start..]);
	}

	out
}

fn payload_size(page: &PageRecord) -> usize {
	page.title.len()
		+ page.text.len()
		+ page.categories.iter().map(String::len).sum::<usize>()
}
