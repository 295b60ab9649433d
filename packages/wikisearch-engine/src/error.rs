use wikisearch_domain::PagingError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Search backend error: {0}")]
	Sphinx(#[from] wikisearch_sphinxql::Error),
	#[error("Content store error: {0}")]
	Store(#[from] wikisearch_store::Error),
	/// The requested page does not exist; the edge layer should redirect to
	/// the carried last valid page.
	#[error(transparent)]
	Paging(#[from] PagingError),
	#[error("Malformed response from searchd: {message}")]
	Malformed { message: String },
}
