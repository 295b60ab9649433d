mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Excerpts, FieldWeights, Ranking, Search, Service, Sphinx, Store};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.sphinx.index.is_empty()
		|| !cfg.sphinx.index.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
	{
		return Err(Error::Validation {
			message: "sphinx.index must be a non-empty identifier (ASCII letters, digits, _)."
				.to_string(),
		});
	}
	if cfg.sphinx.socket.is_none() {
		if cfg.sphinx.host.trim().is_empty() {
			return Err(Error::Validation {
				message: "sphinx.host must be non-empty when sphinx.socket is unset.".to_string(),
			});
		}
		if cfg.sphinx.port == 0 {
			return Err(Error::Validation {
				message: "sphinx.port must be non-zero when sphinx.socket is unset.".to_string(),
			});
		}
	}
	if cfg.sphinx.query_timeout_ms == 0 {
		return Err(Error::Validation {
			message: "sphinx.query_timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.store.dsn.trim().is_empty() {
		return Err(Error::Validation { message: "store.dsn must be non-empty.".to_string() });
	}
	if cfg.store.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "store.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.weights.sum() == 0 {
		return Err(Error::Validation {
			message: "weights must not all be zero.".to_string(),
		});
	}
	if cfg.excerpts.limit == 0 {
		return Err(Error::Validation {
			message: "excerpts.limit must be greater than zero.".to_string(),
		});
	}
	if cfg.search.per_page == 0 {
		return Err(Error::Validation {
			message: "search.per_page must be greater than zero.".to_string(),
		});
	}
	if cfg.search.max_limit < cfg.search.per_page {
		return Err(Error::Validation {
			message: "search.max_limit must be at least search.per_page.".to_string(),
		});
	}
	if cfg.search.display_pages == 0 {
		return Err(Error::Validation {
			message: "search.display_pages must be greater than zero.".to_string(),
		});
	}
	if cfg.search.facets && cfg.search.max_facets == 0 {
		return Err(Error::Validation {
			message: "search.max_facets must be greater than zero when facets are enabled."
				.to_string(),
		});
	}
	if !cfg.ranking.recency_half_life_days.is_finite()
		|| cfg.ranking.recency_half_life_days <= 0.0
	{
		return Err(Error::Validation {
			message: "ranking.recency_half_life_days must be a positive finite number.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.sphinx.host = cfg.sphinx.host.trim().to_string();
	cfg.sphinx.index = cfg.sphinx.index.trim().to_string();

	if cfg
		.sphinx
		.socket
		.as_deref()
		.map(|path| path.as_os_str().is_empty())
		.unwrap_or(false)
	{
		cfg.sphinx.socket = None;
	}
}
