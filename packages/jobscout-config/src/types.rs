use std::fmt;

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub search: Search,
	pub fetch: Fetch,
	pub providers: Providers,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Service {
	pub log_level: String,
}
impl Default for Service {
	fn default() -> Self {
		Self { log_level: "info".to_string() }
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Storage {
	pub mysql: Mysql,
}

/// Connection and table settings for the relational store.
///
/// `host`, `user`, `password`, `database` and `table` are normally supplied through the
/// `DB_*` environment variables.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Mysql {
	pub host: String,
	pub port: u16,
	pub user: String,
	pub password: Secret,
	pub database: String,
	pub table: String,
	/// Rows per multi-row `INSERT` statement inside one batch transaction.
	pub insert_chunk_rows: usize,
}
impl Default for Mysql {
	fn default() -> Self {
		Self {
			host: String::new(),
			port: 3_306,
			user: String::new(),
			password: Secret::default(),
			database: String::new(),
			table: String::new(),
			insert_chunk_rows: 500,
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Search {
	pub keywords: Vec<String>,
	pub location: String,
	/// Provider employment-type code, `F` for full time.
	pub employment_type: String,
	/// Maximum posting age in seconds.
	pub recency_secs: u64,
	/// Tag stored in the `JobType` column for every record of this run.
	pub job_type_code: i32,
	pub max_experience_years: u32,
	pub page_size: u32,
	pub max_results: u32,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			keywords: vec![
				"Software Engineer".to_string(),
				"Backend".to_string(),
				"Cloud Engineer".to_string(),
			],
			location: "United States".to_string(),
			employment_type: "F".to_string(),
			recency_secs: 86_400,
			job_type_code: 1,
			max_experience_years: 1,
			page_size: 25,
			max_results: 1_000,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Fetch {
	pub workers: usize,
	pub cache_capacity: usize,
}
impl Default for Fetch {
	fn default() -> Self {
		Self { workers: 10, cache_capacity: 1_000 }
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Providers {
	pub linkedin: LinkedinProviderConfig,
	pub genai: GenaiProviderConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LinkedinProviderConfig {
	pub api_base: String,
	pub username: String,
	pub password: Secret,
	pub user_agent: String,
	pub timeout_ms: u64,
}
impl Default for LinkedinProviderConfig {
	fn default() -> Self {
		Self {
			api_base: "https://www.linkedin.com".to_string(),
			username: String::new(),
			password: Secret::default(),
			user_agent: default_user_agent(),
			timeout_ms: 30_000,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GenaiProviderConfig {
	pub api_base: String,
	pub api_key: Secret,
	pub model: String,
	pub timeout_ms: u64,
}
impl Default for GenaiProviderConfig {
	fn default() -> Self {
		Self {
			api_base: "https://generativelanguage.googleapis.com".to_string(),
			api_key: Secret::default(),
			model: "gemini-1.5-pro".to_string(),
			timeout_ms: 30_000,
		}
	}
}

/// A credential that never shows up in `Debug` output.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);
impl Secret {
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	pub fn expose(&self) -> &str {
		&self.0
	}

	pub fn is_blank(&self) -> bool {
		self.0.trim().is_empty()
	}
}
impl fmt::Debug for Secret {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.0.is_empty() { f.write_str("Secret(\"\")") } else { f.write_str("Secret(***)") }
	}
}

fn default_user_agent() -> String {
	"Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36"
		.to_string()
}
