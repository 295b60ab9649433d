pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to connect to searchd at {addr}.")]
	Connect { addr: String, source: sqlx::Error },
	#[error("searchd rejected the query: {message}")]
	Query { code: Option<String>, message: String, query: String },
	/// The connection dropped mid-query and the single transparent retry
	/// dropped as well. The client stays disconnected and reconnects lazily
	/// on the next call.
	#[error("Connection to searchd was severed and one retry failed.")]
	Severed { query: String },
	#[error("Query has {placeholders} placeholders but {args} arguments were bound.")]
	BindMismatch { placeholders: usize, args: usize },
}

/// Structured detail of the most recent failure, kept for display by edge
/// layers that degrade instead of propagating.
#[derive(Debug, Clone)]
pub struct LastError {
	pub code: Option<String>,
	pub message: String,
	pub query: String,
}
