use wikisearch_config::Store;
use wikisearch_store::{db::Db, pages};
use wikisearch_testkit::TestDatabase;

#[tokio::test]
#[ignore = "Requires external MySQL. Set WIKISEARCH_DB_DSN to run."]
async fn schema_and_page_roundtrip() {
	let Some(base_dsn) = wikisearch_testkit::env_dsn() else {
		eprintln!("Skipping schema_and_page_roundtrip; set WIKISEARCH_DB_DSN to run this test.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Store { dsn: test_db.dsn().to_string(), pool_max_conns: 2 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to MySQL.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	let categorized = pages::save_page(
		&db,
		0,
		"Categorized Page",
		"Body text of the categorized page.",
		&["History".to_string(), "Rome".to_string()],
	)
	.await
	.expect("Failed to save categorized page.");
	let uncategorized =
		pages::save_page(&db, 0, "Uncategorized Page", "Body text without categories.", &[])
			.await
			.expect("Failed to save uncategorized page.");
	let rows = pages::pages_by_ids(&db, &[categorized, uncategorized])
		.await
		.expect("Failed to fetch pages.");

	assert_eq!(rows.len(), 2, "the category join must not drop uncategorized pages");

	let with_categories = rows
		.iter()
		.find(|row| row.page_id == categorized)
		.expect("Categorized page must be returned.");

	assert_eq!(with_categories.categories, vec!["History".to_string(), "Rome".to_string()]);
	assert_eq!(with_categories.text, "Body text of the categorized page.");

	let without_categories = rows
		.iter()
		.find(|row| row.page_id == uncategorized)
		.expect("Uncategorized page must be returned.");

	assert!(without_categories.categories.is_empty());

	test_db.cleanup().await.expect("Failed to clean up test database.");
}

#[tokio::test]
#[ignore = "Requires external MySQL. Set WIKISEARCH_DB_DSN to run."]
async fn saving_again_replaces_the_body_and_categories() {
	let Some(base_dsn) = wikisearch_testkit::env_dsn() else {
		eprintln!("Skipping saving_again_replaces_the_body_and_categories; set WIKISEARCH_DB_DSN.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Store { dsn: test_db.dsn().to_string(), pool_max_conns: 2 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to MySQL.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	let first = pages::save_page(&db, 0, "Page", "First body.", &["Old".to_string()])
		.await
		.expect("Failed to save page.");
	let second = pages::save_page(&db, 0, "Page", "Second body.", &["New".to_string()])
		.await
		.expect("Failed to save page again.");

	assert_eq!(first, second, "saving the same title must keep one page id");

	let row = pages::page_by_id(&db, first)
		.await
		.expect("Failed to fetch page.")
		.expect("Page must exist.");

	assert_eq!(row.text, "Second body.");
	assert_eq!(row.categories, vec!["New".to_string()]);

	test_db.cleanup().await.expect("Failed to clean up test database.");
}

#[tokio::test]
#[ignore = "Requires external MySQL. Set WIKISEARCH_DB_DSN to run."]
async fn scan_and_existence_checks_page_over_ids() {
	let Some(base_dsn) = wikisearch_testkit::env_dsn() else {
		eprintln!("Skipping scan_and_existence_checks_page_over_ids; set WIKISEARCH_DB_DSN.");

		return;
	};
	let test_db = TestDatabase::new(&base_dsn).await.expect("Failed to create test database.");
	let cfg = Store { dsn: test_db.dsn().to_string(), pool_max_conns: 2 };
	let db = Db::connect(&cfg).await.expect("Failed to connect to MySQL.");

	db.ensure_schema().await.expect("Failed to ensure schema.");

	let mut ids = Vec::new();

	for i in 0..5 {
		ids.push(
			pages::save_page(&db, 0, &format!("Page {i}"), "Body.", &[])
				.await
				.expect("Failed to save page."),
		);
	}

	let first_batch = pages::scan_pages(&db, 0, 3).await.expect("Failed to scan pages.");

	assert_eq!(first_batch.len(), 3);

	let rest = pages::scan_pages(&db, first_batch[2].page_id, 100)
		.await
		.expect("Failed to scan remaining pages.");

	assert_eq!(rest.len(), 2);
	assert_eq!(pages::count_pages(&db).await.expect("Failed to count."), 5);

	pages::delete_page(&db, ids[0]).await.expect("Failed to delete page.");

	let existing =
		pages::existing_page_ids(&db, &ids).await.expect("Failed to check existence.");

	assert!(!existing.contains(&ids[0]));
	assert_eq!(existing.len(), 4);

	test_db.cleanup().await.expect("Failed to clean up test database.");
}
