use std::sync::Arc;

use serde::Serialize;

use jobscout_config::{Fetch, Search};
use jobscout_providers::linkedin::JobQuery;

use crate::{DetailCache, Providers, Result, WorkerPool, stages};

/// Counters for one keyword's pass through search, fetch, estimate and insert.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordReport {
	pub keyword: String,
	pub searched: usize,
	pub fetched: usize,
	pub fetch_failed: usize,
	pub skipped: usize,
	pub estimated: usize,
	pub qualified: usize,
	pub inserted: u64,
	pub insert_failed: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
	pub keywords: Vec<KeywordReport>,
	/// Keywords whose search call failed; nothing was fetched for them.
	pub failed_keywords: Vec<String>,
}
impl RunReport {
	pub fn inserted(&self) -> u64 {
		self.keywords.iter().map(|report| report.inserted).sum()
	}

	pub fn qualified(&self) -> usize {
		self.keywords.iter().map(|report| report.qualified).sum()
	}

	pub fn failed_batches(&self) -> usize {
		self.keywords.iter().filter(|report| report.insert_failed).count()
	}
}

/// Drives the per-keyword stages. The detail cache lives as long as the pipeline, so a posting
/// that shows up under several keywords is fetched once per run.
pub struct Pipeline {
	search: Search,
	providers: Providers,
	cache: Arc<DetailCache>,
	pool: WorkerPool,
}
impl Pipeline {
	pub fn new(search: Search, fetch: &Fetch, providers: Providers) -> Self {
		Self {
			search,
			providers,
			cache: Arc::new(DetailCache::new(fetch.cache_capacity)),
			pool: WorkerPool::new(fetch.workers),
		}
	}

	pub fn cache(&self) -> &DetailCache {
		&self.cache
	}

	/// Runs every configured keyword in order. A keyword whose search fails is recorded and the
	/// next keyword proceeds.
	pub async fn run(&self) -> RunReport {
		let mut report = RunReport::default();

		for keyword in &self.search.keywords {
			match self.run_keyword(keyword).await {
				Ok(keyword_report) => report.keywords.push(keyword_report),
				Err(err) => {
					tracing::error!(keyword = %keyword, error = %err, "Keyword search failed.");

					report.failed_keywords.push(keyword.clone());
				},
			}
		}

		report
	}

	/// Search, fetch, estimate and insert for one keyword. Only a failed search is returned as
	/// an error; later stage failures are counted in the report.
	pub async fn run_keyword(&self, keyword: &str) -> Result<KeywordReport> {
		let query = JobQuery::from_search(&self.search, keyword);
		let summaries = stages::search_stage(self.providers.search.as_ref(), &query).await?;
		let fetched = stages::fetch_stage(
			self.providers.search.clone(),
			self.cache.clone(),
			&self.pool,
			&summaries,
		)
		.await;
		let persisted = stages::persist_stage(
			self.providers.generator.as_ref(),
			self.providers.sink.as_ref(),
			&fetched.details,
			self.search.job_type_code,
			self.search.max_experience_years,
		)
		.await;
		let report = KeywordReport {
			keyword: keyword.to_string(),
			searched: summaries.len(),
			fetched: fetched.details.len(),
			fetch_failed: fetched.failed,
			skipped: persisted.skipped,
			estimated: persisted.estimated,
			qualified: persisted.qualified,
			inserted: persisted.inserted,
			insert_failed: persisted.insert_failed,
		};

		tracing::info!(
			keyword = %report.keyword,
			searched = report.searched,
			fetched = report.fetched,
			fetch_failed = report.fetch_failed,
			skipped = report.skipped,
			qualified = report.qualified,
			inserted = report.inserted,
			insert_failed = report.insert_failed,
			"Keyword finished."
		);

		Ok(report)
	}
}
