mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, Fetch, GenaiProviderConfig, LinkedinProviderConfig, Mysql, Providers, Search, Secret,
	Service, Storage,
};

use std::{env, fs, path::Path};

pub const DB_HOST: &str = "DB_HOST";
pub const DB_USER: &str = "DB_USER";
pub const DB_PASSWORD: &str = "DB_PASSWORD";
pub const DB_NAME: &str = "DB_NAME";
pub const DB_TABLE_NAME: &str = "DB_TABLE_NAME";
pub const LINKEDIN_USERNAME: &str = "LINKEDIN_USERNAME";
pub const LINKEDIN_PASSWORD: &str = "LINKEDIN_PASSWORD";
pub const GENAI_API_KEY: &str = "GENAI_API_KEY";

/// Loads settings from the optional TOML file and overlays credentials from the process
/// environment.
pub fn load(path: Option<&Path>) -> Result<Config> {
	load_with_env(path, |key| env::var(key).ok())
}

pub fn load_with_env<F>(path: Option<&Path>, lookup: F) -> Result<Config>
where
	F: Fn(&str) -> Option<String>,
{
	let mut cfg = match path {
		Some(path) => parse_file(path)?,
		None => Config::default(),
	};

	apply_env(&mut cfg, lookup);
	normalize(&mut cfg);
	require_credentials(&cfg)?;
	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if !is_sql_identifier(&cfg.storage.mysql.table) {
		return Err(Error::Validation {
			message: format!(
				"storage.mysql.table {:?} must contain only ASCII letters, digits, and underscores and must not start with a digit.",
				cfg.storage.mysql.table
			),
		});
	}
	if cfg.storage.mysql.insert_chunk_rows == 0 {
		return Err(Error::Validation {
			message: "storage.mysql.insert_chunk_rows must be greater than zero.".to_string(),
		});
	}
	if cfg.search.keywords.is_empty() {
		return Err(Error::Validation {
			message: "search.keywords must be non-empty.".to_string(),
		});
	}
	if cfg.search.keywords.iter().any(|keyword| keyword.trim().is_empty()) {
		return Err(Error::Validation {
			message: "search.keywords must not contain blank entries.".to_string(),
		});
	}
	if cfg.search.location.trim().is_empty() {
		return Err(Error::Validation {
			message: "search.location must be non-empty.".to_string(),
		});
	}
	if cfg.search.employment_type.trim().is_empty() {
		return Err(Error::Validation {
			message: "search.employment_type must be non-empty.".to_string(),
		});
	}
	if cfg.search.recency_secs == 0 {
		return Err(Error::Validation {
			message: "search.recency_secs must be greater than zero.".to_string(),
		});
	}
	if cfg.search.page_size == 0 {
		return Err(Error::Validation {
			message: "search.page_size must be greater than zero.".to_string(),
		});
	}
	if cfg.search.max_results == 0 {
		return Err(Error::Validation {
			message: "search.max_results must be greater than zero.".to_string(),
		});
	}
	if cfg.fetch.workers == 0 {
		return Err(Error::Validation {
			message: "fetch.workers must be greater than zero.".to_string(),
		});
	}
	if cfg.fetch.cache_capacity == 0 {
		return Err(Error::Validation {
			message: "fetch.cache_capacity must be greater than zero.".to_string(),
		});
	}

	for (label, timeout_ms) in [
		("providers.linkedin.timeout_ms", cfg.providers.linkedin.timeout_ms),
		("providers.genai.timeout_ms", cfg.providers.genai.timeout_ms),
	] {
		if timeout_ms == 0 {
			return Err(Error::Validation { message: format!("{label} must be greater than zero.") });
		}
	}
	for (label, value) in [
		("providers.linkedin.api_base", &cfg.providers.linkedin.api_base),
		("providers.genai.api_base", &cfg.providers.genai.api_base),
		("providers.genai.model", &cfg.providers.genai.model),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	Ok(())
}

/// MySQL identifier check for names interpolated into SQL text.
pub fn is_sql_identifier(name: &str) -> bool {
	let mut chars = name.chars();
	let Some(first) = chars.next() else {
		return false;
	};

	(first.is_ascii_alphabetic() || first == '_')
		&& chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_file(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	toml::from_str(&raw).map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })
}

fn apply_env<F>(cfg: &mut Config, lookup: F)
where
	F: Fn(&str) -> Option<String>,
{
	let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
	let mysql = &mut cfg.storage.mysql;

	if let Some(value) = get(DB_HOST) {
		mysql.host = value;
	}
	if let Some(value) = get(DB_USER) {
		mysql.user = value;
	}
	if let Some(value) = get(DB_PASSWORD) {
		mysql.password = Secret::new(value);
	}
	if let Some(value) = get(DB_NAME) {
		mysql.database = value;
	}
	if let Some(value) = get(DB_TABLE_NAME) {
		mysql.table = value;
	}

	let linkedin = &mut cfg.providers.linkedin;

	if let Some(value) = get(LINKEDIN_USERNAME) {
		linkedin.username = value;
	}
	if let Some(value) = get(LINKEDIN_PASSWORD) {
		linkedin.password = Secret::new(value);
	}
	if let Some(value) = get(GENAI_API_KEY) {
		cfg.providers.genai.api_key = Secret::new(value);
	}
}

fn normalize(cfg: &mut Config) {
	cfg.storage.mysql.host = cfg.storage.mysql.host.trim().to_string();
	cfg.storage.mysql.table = cfg.storage.mysql.table.trim().to_string();
	cfg.search.keywords =
		cfg.search.keywords.iter().map(|keyword| keyword.trim().to_string()).collect();
	cfg.search.location = cfg.search.location.trim().to_string();

	for api_base in [&mut cfg.providers.linkedin.api_base, &mut cfg.providers.genai.api_base] {
		while api_base.ends_with('/') {
			api_base.pop();
		}
	}
}

fn require_credentials(cfg: &Config) -> Result<()> {
	let mysql = &cfg.storage.mysql;
	let linkedin = &cfg.providers.linkedin;

	for (key, blank) in [
		(DB_HOST, mysql.host.is_empty()),
		(DB_USER, mysql.user.trim().is_empty()),
		(DB_PASSWORD, mysql.password.is_blank()),
		(DB_NAME, mysql.database.trim().is_empty()),
		(DB_TABLE_NAME, mysql.table.is_empty()),
		(LINKEDIN_USERNAME, linkedin.username.trim().is_empty()),
		(LINKEDIN_PASSWORD, linkedin.password.is_blank()),
		(GENAI_API_KEY, cfg.providers.genai.api_key.is_blank()),
	] {
		if blank {
			return Err(Error::MissingEnv { key });
		}
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn identifier_check_rejects_injection() {
		assert!(is_sql_identifier("jobs"));
		assert!(is_sql_identifier("_jobs_2024"));
		assert!(!is_sql_identifier(""));
		assert!(!is_sql_identifier("2024_jobs"));
		assert!(!is_sql_identifier("jobs; DROP TABLE users"));
		assert!(!is_sql_identifier("jobs`"));
	}

	#[test]
	fn secret_debug_is_redacted() {
		let secret = Secret::new("hunter2");

		assert_eq!(format!("{secret:?}"), "Secret(***)");
		assert_eq!(secret.expose(), "hunter2");
	}
}
