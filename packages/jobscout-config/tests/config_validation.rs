use std::{collections::HashMap, path::PathBuf};

use jobscout_config::{Config, Error};

fn fixture_path() -> PathBuf {
	PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sample_config.toml")
}

fn full_env() -> HashMap<&'static str, &'static str> {
	HashMap::from([
		("DB_HOST", "localhost"),
		("DB_USER", "scout"),
		("DB_PASSWORD", "db-secret"),
		("DB_NAME", "scouting"),
		("DB_TABLE_NAME", "jobs"),
		("LINKEDIN_USERNAME", "someone@example.com"),
		("LINKEDIN_PASSWORD", "li-secret"),
		("GENAI_API_KEY", "genai-secret"),
	])
}

fn load_with(
	path: Option<PathBuf>,
	env: &HashMap<&'static str, &'static str>,
) -> jobscout_config::Result<Config> {
	jobscout_config::load_with_env(path.as_deref(), |key| env.get(key).map(|v| v.to_string()))
}

#[test]
fn defaults_follow_the_batch_job() {
	let cfg = load_with(None, &full_env()).expect("Failed to load config.");

	assert_eq!(cfg.search.keywords, vec!["Software Engineer", "Backend", "Cloud Engineer"]);
	assert_eq!(cfg.search.location, "United States");
	assert_eq!(cfg.search.employment_type, "F");
	assert_eq!(cfg.search.recency_secs, 86_400);
	assert_eq!(cfg.search.job_type_code, 1);
	assert_eq!(cfg.search.max_experience_years, 1);
	assert_eq!(cfg.fetch.workers, 10);
	assert_eq!(cfg.fetch.cache_capacity, 1_000);
	assert_eq!(cfg.providers.genai.model, "gemini-1.5-pro");
	assert_eq!(cfg.storage.mysql.port, 3_306);
	assert_eq!(cfg.storage.mysql.table, "jobs");
	assert_eq!(cfg.providers.genai.api_key.expose(), "genai-secret");
}

#[test]
fn file_settings_are_overlaid_with_env_credentials() {
	let cfg = load_with(Some(fixture_path()), &full_env()).expect("Failed to load config.");

	assert_eq!(cfg.service.log_level, "jobscout=debug,info");
	assert_eq!(cfg.storage.mysql.port, 3_307);
	assert_eq!(cfg.storage.mysql.insert_chunk_rows, 200);
	// Environment wins over the file.
	assert_eq!(cfg.storage.mysql.host, "localhost");
	assert_eq!(cfg.storage.mysql.user, "scout");
	assert_eq!(cfg.storage.mysql.table, "jobs");
	assert_eq!(cfg.search.keywords, vec!["Rust Engineer", "Platform"]);
	assert_eq!(cfg.search.recency_secs, 604_800);
	assert_eq!(cfg.fetch.workers, 4);
	assert_eq!(cfg.providers.linkedin.api_base, "https://www.linkedin.com");
	assert_eq!(cfg.providers.linkedin.timeout_ms, 15_000);
	assert_eq!(cfg.providers.genai.model, "gemini-1.5-flash");
}

#[test]
fn missing_credential_names_the_variable() {
	let mut env = full_env();

	env.remove("GENAI_API_KEY");

	let err = load_with(None, &env).expect_err("Expected missing key error.");

	assert!(matches!(err, Error::MissingEnv { key: "GENAI_API_KEY" }), "{err:?}");
}

#[test]
fn blank_credential_counts_as_missing() {
	let mut env = full_env();

	env.insert("DB_PASSWORD", "   ");

	let err = load_with(None, &env).expect_err("Expected missing key error.");

	assert!(matches!(err, Error::MissingEnv { key: "DB_PASSWORD" }), "{err:?}");
}

#[test]
fn rejects_unsafe_table_name() {
	let mut env = full_env();

	env.insert("DB_TABLE_NAME", "jobs; DROP TABLE users");

	let err = load_with(None, &env).expect_err("Expected validation error.");

	assert!(matches!(err, Error::Validation { .. }), "{err:?}");
}

#[test]
fn rejects_zero_workers() {
	let mut cfg = load_with(None, &full_env()).expect("Failed to load config.");

	cfg.fetch.workers = 0;

	let err = jobscout_config::validate(&cfg).expect_err("Expected validation error.");

	assert!(err.to_string().contains("fetch.workers"));
}

#[test]
fn rejects_zero_recency_window() {
	let mut cfg = load_with(None, &full_env()).expect("Failed to load config.");

	cfg.search.recency_secs = 0;

	let err = jobscout_config::validate(&cfg).expect_err("Expected validation error.");

	assert!(err.to_string().contains("search.recency_secs"));
}

#[test]
fn rejects_blank_keyword() {
	let mut cfg = load_with(None, &full_env()).expect("Failed to load config.");

	cfg.search.keywords.push("  ".to_string());

	let err = jobscout_config::validate(&cfg).expect_err("Expected validation error.");

	assert!(err.to_string().contains("search.keywords"));
}

#[test]
fn missing_file_reports_path() {
	let path = PathBuf::from("/nonexistent/jobscout.toml");
	let err = load_with(Some(path.clone()), &full_env()).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { path: ref p, .. } if *p == path), "{err:?}");
}
