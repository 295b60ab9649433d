//! Helpers for the env-gated integration tests.
//!
//! `WIKISEARCH_DB_DSN` points at a MySQL server the tests may create
//! throwaway databases on; `WIKISEARCH_SPHINX_ADDR` (`host:port`) points at
//! a searchd daemon with a writable real-time index.

mod error;

pub use error::{Error, Result};

use std::{env, str::FromStr};

use sqlx::{
	ConnectOptions, Connection, Executor,
	mysql::{MySqlConnectOptions, MySqlConnection},
};
use uuid::Uuid;

pub fn env_dsn() -> Option<String> {
	env::var("WIKISEARCH_DB_DSN").ok().filter(|dsn| !dsn.trim().is_empty())
}

pub fn env_sphinx_addr() -> Option<(String, u16)> {
	let raw = env::var("WIKISEARCH_SPHINX_ADDR").ok()?;
	let (host, port) = raw.rsplit_once(':')?;
	let port = port.parse().ok()?;

	Some((host.to_string(), port))
}

/// A throwaway database created on the configured MySQL server and dropped
/// on cleanup.
pub struct TestDatabase {
	name: String,
	dsn: String,
	admin_options: MySqlConnectOptions,
	cleaned: bool,
}
impl TestDatabase {
	pub async fn new(base_dsn: &str) -> Result<Self> {
		let base_options = MySqlConnectOptions::from_str(base_dsn)
			.map_err(|err| Error::Message(format!("Failed to parse WIKISEARCH_DB_DSN: {err}.")))?;
		let mut admin_conn = MySqlConnection::connect_with(&base_options)
			.await
			.map_err(|err| Error::Message(format!("Failed to connect to MySQL: {err}.")))?;
		let name = format!("wikisearch_test_{}", Uuid::new_v4().simple());
		let create_sql = format!("CREATE DATABASE `{name}`");

		admin_conn
			.execute(create_sql.as_str())
			.await
			.map_err(|err| Error::Message(format!("Failed to create test database: {err}.")))?;
		admin_conn.close().await.ok();

		let dsn = base_options.clone().database(&name).to_url_lossy().to_string();

		Ok(Self { name, dsn, admin_options: base_options, cleaned: false })
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub async fn cleanup(mut self) -> Result<()> {
		let mut admin_conn = MySqlConnection::connect_with(&self.admin_options)
			.await
			.map_err(|err| Error::Message(format!("Failed to connect to MySQL: {err}.")))?;
		let drop_sql = format!("DROP DATABASE IF EXISTS `{}`", self.name);

		admin_conn
			.execute(drop_sql.as_str())
			.await
			.map_err(|err| Error::Message(format!("Failed to drop test database: {err}.")))?;
		admin_conn.close().await.ok();

		self.cleaned = true;

		Ok(())
	}
}
impl Drop for TestDatabase {
	fn drop(&mut self) {
		if !self.cleaned {
			eprintln!("Test database {} was not cleaned up; drop it manually.", self.name);
		}
	}
}
