use time::OffsetDateTime;

/// One canonical document joined with its latest body and category list.
#[derive(Debug, Clone)]
pub struct PageRecord {
	pub page_id: u64,
	pub namespace: i64,
	pub title: String,
	pub text: String,
	pub categories: Vec<String>,
	pub created: OffsetDateTime,
	pub touched: OffsetDateTime,
}
