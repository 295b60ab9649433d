//! Query layer over the documents, revisions, and category tables.

use std::collections::HashSet;

use sqlx::{MySql, QueryBuilder, Row, mysql::MySqlRow};

use crate::{Result, db::Db, models::PageRecord};

/// Separator used for category aggregation. Newlines cannot occur in
/// category names, unlike commas.
const CATEGORY_SEPARATOR: char = '\n';

const PAGE_SELECT: &str = "\
SELECT
	p.page_id,
	p.page_namespace,
	p.page_title,
	p.page_created,
	p.page_touched,
	t.old_text,
	GROUP_CONCAT(cl.cl_to ORDER BY cl.cl_to SEPARATOR '\\n') AS categories
FROM page p
JOIN revision r ON r.rev_id = p.page_latest
JOIN `text` t ON t.old_id = r.rev_text_id
LEFT JOIN categorylinks cl ON cl.cl_from = p.page_id";

/// Fetches full rows for an id set in one batched lookup. Row order is
/// whatever the store returns; callers re-index into their own order.
pub async fn pages_by_ids(db: &Db, ids: &[u64]) -> Result<Vec<PageRecord>> {
	if ids.is_empty() {
		return Ok(Vec::new());
	}

	let mut builder = QueryBuilder::<MySql>::new(format!("{PAGE_SELECT}\nWHERE p.page_id IN ("));
	let mut separated = builder.separated(", ");

	for id in ids {
		separated.push_bind(*id);
	}

	builder.push(") GROUP BY p.page_id");

	let rows = builder.build().fetch_all(&db.pool).await?;

	rows.iter().map(page_from_row).collect()
}

pub async fn page_by_id(db: &Db, id: u64) -> Result<Option<PageRecord>> {
	Ok(pages_by_ids(db, &[id]).await?.pop())
}

/// Keyset batch used by the full reindex scan.
pub async fn scan_pages(db: &Db, after_id: u64, batch: u32) -> Result<Vec<PageRecord>> {
	let sql =
		format!("{PAGE_SELECT}\nWHERE p.page_id > ? GROUP BY p.page_id ORDER BY p.page_id LIMIT ?");
	let rows = sqlx::query(&sql).bind(after_id).bind(batch).fetch_all(&db.pool).await?;

	rows.iter().map(page_from_row).collect()
}

pub async fn count_pages(db: &Db) -> Result<u64> {
	let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM page").fetch_one(&db.pool).await?;

	Ok(count.max(0) as u64)
}

/// Which of `ids` still exist in the store. Used by the index purge.
pub async fn existing_page_ids(db: &Db, ids: &[u64]) -> Result<HashSet<u64>> {
	if ids.is_empty() {
		return Ok(HashSet::new());
	}

	let mut builder = QueryBuilder::<MySql>::new("SELECT page_id FROM page WHERE page_id IN (");
	let mut separated = builder.separated(", ");

	for id in ids {
		separated.push_bind(*id);
	}

	builder.push(")");

	let rows = builder.build().fetch_all(&db.pool).await?;

	rows.iter().map(|row| Ok(row.try_get::<u64, _>(0)?)).collect()
}

pub async fn categories_for_page(db: &Db, id: u64) -> Result<Vec<String>> {
	let rows =
		sqlx::query("SELECT cl_to FROM categorylinks WHERE cl_from = ? ORDER BY cl_to")
			.bind(id)
			.fetch_all(&db.pool)
			.await?;

	rows.iter().map(|row| Ok(row.try_get::<String, _>(0)?)).collect()
}

/// Creates or replaces a document: new body revision, refreshed category
/// links, bumped latest pointer. Returns the page id.
pub async fn save_page(
	db: &Db,
	namespace: i64,
	title: &str,
	text: &str,
	categories: &[String],
) -> Result<u64> {
	let mut tx = db.pool.begin().await?;
	let text_id = sqlx::query("INSERT INTO `text` (old_text) VALUES (?)")
		.bind(text)
		.execute(&mut *tx)
		.await?
		.last_insert_id();

	sqlx::query(
		"\
INSERT INTO page (page_namespace, page_title, page_latest)
VALUES (?, ?, 0)
ON DUPLICATE KEY UPDATE page_touched = CURRENT_TIMESTAMP",
	)
	.bind(namespace)
	.bind(title)
	.execute(&mut *tx)
	.await?;

	let page_id: u64 =
		sqlx::query_scalar("SELECT page_id FROM page WHERE page_namespace = ? AND page_title = ?")
			.bind(namespace)
			.bind(title)
			.fetch_one(&mut *tx)
			.await?;
	let rev_id = sqlx::query("INSERT INTO revision (rev_page, rev_text_id) VALUES (?, ?)")
		.bind(page_id)
		.bind(text_id)
		.execute(&mut *tx)
		.await?
		.last_insert_id();

	sqlx::query("UPDATE page SET page_latest = ? WHERE page_id = ?")
		.bind(rev_id)
		.bind(page_id)
		.execute(&mut *tx)
		.await?;
	sqlx::query("DELETE FROM categorylinks WHERE cl_from = ?")
		.bind(page_id)
		.execute(&mut *tx)
		.await?;

	for category in categories {
		sqlx::query("INSERT IGNORE INTO categorylinks (cl_from, cl_to) VALUES (?, ?)")
			.bind(page_id)
			.bind(category)
			.execute(&mut *tx)
			.await?;
	}

	tx.commit().await?;

	Ok(page_id)
}

pub async fn delete_page(db: &Db, id: u64) -> Result<()> {
	let mut tx = db.pool.begin().await?;

	sqlx::query(
		"DELETE t FROM `text` t JOIN revision r ON r.rev_text_id = t.old_id WHERE r.rev_page = ?",
	)
	.bind(id)
	.execute(&mut *tx)
	.await?;
	sqlx::query("DELETE FROM revision WHERE rev_page = ?").bind(id).execute(&mut *tx).await?;
	sqlx::query("DELETE FROM categorylinks WHERE cl_from = ?")
		.bind(id)
		.execute(&mut *tx)
		.await?;
	sqlx::query("DELETE FROM page WHERE page_id = ?").bind(id).execute(&mut *tx).await?;

	tx.commit().await?;

	Ok(())
}

fn page_from_row(row: &MySqlRow) -> Result<PageRecord> {
	let categories: Option<String> = row.try_get("categories")?;
	let categories = categories
		.map(|joined| {
			joined
				.split(CATEGORY_SEPARATOR)
				.filter(|name| !name.is_empty())
				.map(str::to_string)
				.collect()
		})
		.unwrap_or_default();

	Ok(PageRecord {
		page_id: row.try_get("page_id")?,
		namespace: row.try_get("page_namespace")?,
		title: row.try_get("page_title")?,
		text: row.try_get("old_text")?,
		categories,
		created: row.try_get("page_created")?,
		touched: row.try_get("page_touched")?,
	})
}
