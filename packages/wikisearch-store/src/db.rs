use sqlx::{MySqlPool, mysql::MySqlPoolOptions};

use crate::{Result, schema};

pub struct Db {
	pub pool: MySqlPool,
}
impl Db {
	pub async fn connect(cfg: &wikisearch_config::Store) -> Result<Self> {
		let pool = MySqlPoolOptions::new()
			.max_connections(cfg.pool_max_conns)
			.after_connect(|conn, _meta| {
				Box::pin(async move {
					// Category lists are aggregated with GROUP_CONCAT; the
					// server default cap of 1024 bytes silently truncates.
					sqlx::query("SET SESSION group_concat_max_len = 1048576")
						.execute(&mut *conn)
						.await?;

					Ok(())
				})
			})
			.connect(&cfg.dsn)
			.await?;

		Ok(Self { pool })
	}

	pub async fn ensure_schema(&self) -> Result<()> {
		for statement in schema::render_schema().split(';') {
			let trimmed = statement.trim();

			if trimmed.is_empty() {
				continue;
			}

			sqlx::query(trimmed).execute(&self.pool).await?;
		}

		Ok(())
	}
}
