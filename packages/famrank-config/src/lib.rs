mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Index, Postgres, Search, Security, Service, Storage};

use std::{fs, path::Path};

pub const MAX_DEBOUNCE_MS: u64 = 10_000;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	parse(&raw).map_err(|err| match err {
		Error::ParseConfig { source, .. } =>
			Error::ParseConfig { path: path.to_path_buf(), source },
		other => other,
	})
}

pub fn parse(raw: &str) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw)
		.map_err(|err| Error::ParseConfig { path: Default::default(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	for (label, value) in
		[("service.http_bind", &cfg.service.http_bind), ("service.admin_bind", &cfg.service.admin_bind)]
	{
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.search.debounce_ms > MAX_DEBOUNCE_MS {
		return Err(Error::Validation {
			message: format!("search.debounce_ms must be {MAX_DEBOUNCE_MS} or less."),
		});
	}

	for (label, value) in [
		("search.min_search_length", cfg.search.min_search_length),
		("search.max_results", cfg.search.max_results),
		("search.substring_scan_limit", cfg.search.substring_scan_limit),
		("search.suggest_limit", cfg.search.suggest_limit),
	] {
		if value == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	if cfg.index.enabled {
		if cfg.index.api_base.trim().is_empty() {
			return Err(Error::Validation {
				message: "index.api_base must be non-empty when the index is enabled.".to_string(),
			});
		}
		if cfg.index.timeout_ms == 0 {
			return Err(Error::Validation {
				message: "index.timeout_ms must be greater than zero.".to_string(),
			});
		}

		for path in [&cfg.index.health_path, &cfg.index.search_path, &cfg.index.upsert_path] {
			if !path.starts_with('/') {
				return Err(Error::Validation {
					message: format!("Index path {path:?} must start with '/'."),
				});
			}
		}
	}
	if cfg.index.default_headers.values().any(|value| !value.is_string()) {
		return Err(Error::Validation {
			message: "index.default_headers values must be strings.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	// A keyless index can never pass the health check; run in datastore-only mode instead.
	if cfg.index.api_key.trim().is_empty() {
		cfg.index.enabled = false;
	}

	cfg.index.api_base = cfg.index.api_base.trim().trim_end_matches('/').to_string();
}
