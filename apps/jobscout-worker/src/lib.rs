pub mod cli;

mod error;

pub use error::{Error, Result};

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use jobscout_config::Config;
use jobscout_providers::{genai::GenaiClient, linkedin::LinkedinClient};
use jobscout_service::{Pipeline, Providers, RunReport, TableSink};
use jobscout_storage::db::Db;

#[derive(Debug, Parser)]
#[command(
	version = cli::VERSION,
	rename_all = "kebab",
	styles = cli::styles(),
)]
pub struct Args {
	/// TOML config file. Built-in defaults and `DB_*`, `LINKEDIN_*`, `GENAI_API_KEY` environment
	/// variables are used when omitted.
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: Option<PathBuf>,
	/// Search keyword; repeat to search several. Replaces the configured keyword list.
	#[arg(long = "keyword", short = 'k', value_name = "KEYWORD")]
	pub keywords: Vec<String>,
	/// Create the jobs table if it does not exist before searching.
	#[arg(long)]
	pub ensure_table: bool,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	// `.env` is optional.
	let _ = dotenvy::dotenv();
	let config = load_config(&args)?;

	init_tracing(&config)?;

	let db = match Db::connect(&config.storage.mysql).await {
		Ok(db) => db,
		Err(err) => {
			tracing::error!(
				host = %config.storage.mysql.host,
				database = %config.storage.mysql.database,
				error = %err,
				"Database connection failed; nothing to do."
			);

			return Ok(());
		},
	};
	let db = Arc::new(db);

	tracing::info!(database = %config.storage.mysql.database, "Database connected.");

	let providers = match connect_providers(&config, db.clone(), args.ensure_table).await {
		Ok(providers) => providers,
		Err(err) => {
			db.close().await;

			return Err(err.into());
		},
	};
	let pipeline = Pipeline::new(config.search.clone(), &config.fetch, providers);
	let report = pipeline.run().await;

	db.close().await;
	log_summary(&report);

	Ok(())
}

/// Loads configuration and applies command-line overrides.
pub fn load_config(args: &Args) -> Result<Config> {
	let mut config = jobscout_config::load(args.config.as_deref())?;

	override_keywords(&mut config, &args.keywords)?;

	Ok(config)
}

/// Replaces the configured keywords with trimmed `keywords` unless none were given.
fn override_keywords(config: &mut Config, keywords: &[String]) -> Result<()> {
	if keywords.is_empty() {
		return Ok(());
	}

	config.search.keywords = keywords.iter().map(|keyword| keyword.trim().to_string()).collect();

	jobscout_config::validate(config)?;

	Ok(())
}

async fn connect_providers(
	config: &Config,
	db: Arc<Db>,
	ensure_table: bool,
) -> Result<Providers> {
	let mysql = &config.storage.mysql;

	if ensure_table {
		db.ensure_table(&mysql.table).await?;

		tracing::info!(table = %mysql.table, "Jobs table ensured.");
	}

	let linkedin = LinkedinClient::login(&config.providers.linkedin).await?;
	let genai = GenaiClient::new(&config.providers.genai)?;

	tracing::info!(model = %config.providers.genai.model, "Generative model configured.");

	let sink = TableSink::new(db, mysql.table.clone(), mysql.insert_chunk_rows);

	Ok(Providers::new(Arc::new(linkedin), Arc::new(genai), Arc::new(sink)))
}

fn init_tracing(config: &Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	Ok(())
}

fn log_summary(report: &RunReport) {
	tracing::info!(
		keywords = report.keywords.len(),
		failed_keywords = report.failed_keywords.len(),
		qualified = report.qualified(),
		inserted = report.inserted(),
		failed_batches = report.failed_batches(),
		"Run finished."
	);

	match serde_json::to_string(report) {
		Ok(json) => tracing::debug!(report = %json, "Run report."),
		Err(err) => tracing::warn!(error = %err, "Failed to serialize run report."),
	}
}

#[cfg(test)]
mod tests {
	use clap::CommandFactory;

	use super::*;

	#[test]
	fn command_definition_is_valid() {
		Args::command().debug_assert();
	}

	#[test]
	fn keywords_repeat_and_config_is_optional() {
		let args = Args::try_parse_from([
			"jobscout",
			"--keyword",
			"Backend",
			"-k",
			"Cloud Engineer",
			"--ensure-table",
		])
		.expect("Failed to parse args.");

		assert_eq!(args.keywords, vec!["Backend".to_string(), "Cloud Engineer".to_string()]);
		assert!(args.config.is_none());
		assert!(args.ensure_table);
	}

	#[test]
	fn defaults_to_configured_keywords() {
		let args = Args::try_parse_from(["jobscout", "-c", "jobscout.toml"])
			.expect("Failed to parse args.");

		assert!(args.keywords.is_empty());
		assert_eq!(args.config, Some(PathBuf::from("jobscout.toml")));
		assert!(!args.ensure_table);
	}

	fn valid_config() -> Config {
		let mut config = Config::default();

		config.storage.mysql.table = "jobs".to_string();

		config
	}

	#[test]
	fn keyword_override_is_trimmed() {
		let mut config = valid_config();

		let keywords = [" Backend ".to_string(), "Cloud Engineer\t".to_string()];

		override_keywords(&mut config, &keywords).expect("Override failed.");

		assert_eq!(config.search.keywords, ["Backend", "Cloud Engineer"]);
	}

	#[test]
	fn blank_keyword_override_is_rejected() {
		let mut config = valid_config();
		let err =
			override_keywords(&mut config, &["   ".to_string()]).expect_err("Expected error.");

		assert!(matches!(err, Error::Config(jobscout_config::Error::Validation { .. })));
	}

	#[test]
	fn empty_override_keeps_configured_keywords() {
		let mut config = valid_config();
		let configured = config.search.keywords.clone();

		override_keywords(&mut config, &[]).expect("Override failed.");

		assert_eq!(config.search.keywords, configured);
	}
}
