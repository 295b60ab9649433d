//! SphinxQL protocol client.
//!
//! A single lazily-established MySQL-wire connection to the searchd daemon.
//! The query/response pairing carries no request tagging, so one client must
//! never be shared across concurrent request sequences; each logical request
//! owns its client for the duration of its pipeline.

mod bind;
mod error;

pub use bind::{Bind, escape_str, interpolate, quote_str};
pub use error::{Error, LastError, Result};

use std::time::Duration;

use sqlx::{
	Connection,
	mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow},
};

use wikisearch_config::Sphinx;

pub struct SphinxClient {
	cfg: Sphinx,
	conn: Option<MySqlConnection>,
	last_error: Option<LastError>,
}

enum CallError {
	Connect(Error),
	Sql(sqlx::Error),
}

impl SphinxClient {
	pub fn new(cfg: Sphinx) -> Self {
		Self { cfg, conn: None, last_error: None }
	}

	pub fn endpoint(&self) -> String {
		match &self.cfg.socket {
			Some(path) => path.display().to_string(),
			None => format!("{}:{}", self.cfg.host, self.cfg.port),
		}
	}

	/// Drops the current connection. The next call reconnects lazily.
	pub fn disconnect(&mut self) {
		self.conn = None;
	}

	/// Structured detail of the most recent failed call, or `None` when the
	/// last call succeeded.
	pub fn last_error(&self) -> Option<&LastError> {
		self.last_error.as_ref()
	}

	/// Runs a row-returning statement assembled from `query` and `binds`.
	///
	/// A severed connection (I/O failure, server-gone-away, or per-call
	/// timeout) is retried exactly once on a fresh connection; if the retry
	/// is severed too the client marks itself crashed and surfaces
	/// [`Error::Severed`].
	pub async fn select(&mut self, query: &str, binds: &[Bind]) -> Result<Vec<MySqlRow>> {
		let sql = bind::interpolate(query, binds)?;

		self.last_error = None;

		match self.fetch_once(&sql).await {
			Ok(rows) => Ok(rows),
			Err(err) if is_severed(&err) => {
				tracing::warn!(
					endpoint = %self.endpoint(),
					"Connection to searchd severed mid-query; retrying once."
				);
				self.conn = None;

				match self.fetch_once(&sql).await {
					Ok(rows) => Ok(rows),
					Err(err) if is_severed(&err) => Err(self.crashed(err, sql)),
					Err(err) => Err(self.rejected(err, sql)),
				}
			},
			Err(err) => Err(self.rejected(err, sql)),
		}
	}

	/// Runs a non-row statement and returns the affected row count. Same
	/// retry semantics as [`Self::select`].
	pub async fn execute(&mut self, query: &str, binds: &[Bind]) -> Result<u64> {
		let sql = bind::interpolate(query, binds)?;

		self.last_error = None;

		match self.execute_once(&sql).await {
			Ok(affected) => Ok(affected),
			Err(err) if is_severed(&err) => {
				tracing::warn!(
					endpoint = %self.endpoint(),
					"Connection to searchd severed mid-query; retrying once."
				);
				self.conn = None;

				match self.execute_once(&sql).await {
					Ok(affected) => Ok(affected),
					Err(err) if is_severed(&err) => Err(self.crashed(err, sql)),
					Err(err) => Err(self.rejected(err, sql)),
				}
			},
			Err(err) => Err(self.rejected(err, sql)),
		}
	}

	async fn fetch_once(&mut self, sql: &str) -> Result<Vec<MySqlRow>, CallError> {
		let timeout = Duration::from_millis(self.cfg.query_timeout_ms);
		let conn = self.ensure_connected().await.map_err(CallError::Connect)?;

		match tokio::time::timeout(timeout, sqlx::raw_sql(sql).fetch_all(&mut *conn)).await {
			Ok(result) => result.map_err(CallError::Sql),
			Err(_) => Err(CallError::Sql(timeout_error())),
		}
	}

	async fn execute_once(&mut self, sql: &str) -> Result<u64, CallError> {
		let timeout = Duration::from_millis(self.cfg.query_timeout_ms);
		let conn = self.ensure_connected().await.map_err(CallError::Connect)?;

		match tokio::time::timeout(timeout, sqlx::raw_sql(sql).execute(&mut *conn)).await {
			Ok(result) => result.map(|done| done.rows_affected()).map_err(CallError::Sql),
			Err(_) => Err(CallError::Sql(timeout_error())),
		}
	}

	async fn ensure_connected(&mut self) -> Result<&mut MySqlConnection> {
		let conn = match self.conn.take() {
			Some(conn) => conn,
			None => {
				let options = self.connect_options();
				let endpoint = self.endpoint();
				let conn = MySqlConnection::connect_with(&options)
					.await
					.map_err(|source| Error::Connect { addr: endpoint.clone(), source })?;

				tracing::debug!(%endpoint, "Connected to searchd.");

				conn
			},
		};

		Ok(self.conn.insert(conn))
	}

	fn connect_options(&self) -> MySqlConnectOptions {
		let mut options = MySqlConnectOptions::new().host(&self.cfg.host).port(self.cfg.port);

		if let Some(socket) = &self.cfg.socket {
			options = options.socket(socket);
		}

		options
	}

	fn rejected(&mut self, err: CallError, sql: String) -> Error {
		match err {
			CallError::Connect(err) => {
				self.record(None, err.to_string(), sql);

				err
			},
			CallError::Sql(err) => {
				let code = match &err {
					sqlx::Error::Database(db) => db.code().map(|code| code.to_string()),
					_ => None,
				};
				let message = err.to_string();

				self.record(code.clone(), message.clone(), sql.clone());

				Error::Query { code, message, query: sql }
			},
		}
	}

	fn crashed(&mut self, err: CallError, sql: String) -> Error {
		self.conn = None;

		let message = match &err {
			CallError::Sql(err) => err.to_string(),
			CallError::Connect(err) => err.to_string(),
		};

		self.record(None, message, sql.clone());

		Error::Severed { query: sql }
	}

	fn record(&mut self, code: Option<String>, message: String, query: String) {
		self.last_error = Some(LastError { code, message, query });
	}
}

fn timeout_error() -> sqlx::Error {
	sqlx::Error::Io(std::io::Error::new(std::io::ErrorKind::TimedOut, "query timed out"))
}

fn is_severed(err: &CallError) -> bool {
	match err {
		CallError::Sql(err) => is_severed_sql(err),
		CallError::Connect(_) => false,
	}
}

/// The fatal-disconnect signature: transport-level failures, or the MySQL
/// server-gone-away / lost-connection conditions (2006/2013).
fn is_severed_sql(err: &sqlx::Error) -> bool {
	match err {
		sqlx::Error::Io(_) => true,
		sqlx::Error::Database(db) => {
			if matches!(db.code().as_deref(), Some("2006") | Some("2013")) {
				return true;
			}

			let message = db.message().to_lowercase();

			message.contains("server has gone away") || message.contains("lost connection")
		},
		_ => false,
	}
}
