use std::{collections::HashSet, sync::Arc};

use serde_json::Value;

use jobscout_domain::{
	ExperienceEstimate, JobDetail, JobRecord, JobSummary,
	experience::{self, EstimateSource},
};
use jobscout_providers::linkedin::JobQuery;

use crate::{DetailCache, JobSearchProvider, JobSink, Result, TextGenerator, WorkerPool};

/// Job documents pulled for one keyword, plus how many lookups did not produce one.
#[derive(Debug, Default)]
pub struct FetchOutcome {
	pub details: Vec<(i64, Arc<Value>)>,
	pub failed: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PersistOutcome {
	pub skipped: usize,
	pub estimated: usize,
	pub qualified: usize,
	pub inserted: u64,
	pub insert_failed: bool,
}

pub async fn search_stage(
	provider: &dyn JobSearchProvider,
	query: &JobQuery,
) -> Result<Vec<JobSummary>> {
	let summaries = provider.search_jobs(query).await?;

	tracing::info!(keywords = %query.keywords, found = summaries.len(), "Search finished.");

	Ok(summaries)
}

/// Resolves every summary to a job id and fetches the documents on the worker pool.
///
/// Ids repeated within the batch are fetched once. Unresolvable URNs and failed fetches are
/// logged and counted; they never stop the rest of the batch.
pub async fn fetch_stage(
	provider: Arc<dyn JobSearchProvider>,
	cache: Arc<DetailCache>,
	pool: &WorkerPool,
	summaries: &[JobSummary],
) -> FetchOutcome {
	let mut outcome = FetchOutcome::default();
	let mut seen = HashSet::new();
	let mut ids = Vec::with_capacity(summaries.len());

	for summary in summaries {
		match summary.job_id() {
			Ok(id) if seen.insert(id) => ids.push(id),
			Ok(_) => {},
			Err(err) => {
				tracing::warn!(urn = %summary.tracking_urn, error = %err, "Skipping job summary.");

				outcome.failed += 1;
			},
		}
	}

	let results = pool
		.run(ids.clone(), |id| {
			let provider = provider.clone();
			let cache = cache.clone();

			async move { cache.get_or_fetch(id, || provider.get_job(id)).await }
		})
		.await;

	for (id, result) in ids.into_iter().zip(results) {
		match result {
			Ok(raw) => outcome.details.push((id, raw)),
			Err(err) => {
				tracing::warn!(job_id = id, error = %err, "Job fetch failed.");

				outcome.failed += 1;
			},
		}
	}

	tracing::debug!(
		fetched = outcome.details.len(),
		failed = outcome.failed,
		cache_hits = cache.hits(),
		cache_misses = cache.misses(),
		"Fetch finished."
	);

	outcome
}

/// Asks the generator for the minimum years a description requires.
pub async fn enrich(
	generator: &dyn TextGenerator,
	description: &str,
) -> Result<ExperienceEstimate> {
	let prompt = experience::experience_prompt(description);
	let answer = generator.generate(&prompt).await?;
	let estimate = experience::estimate_from_response(&answer);

	if estimate.source == EstimateSource::Default {
		tracing::debug!(answer = %answer.trim(), "No number in experience answer; using 0.");
	}

	Ok(estimate)
}

/// Turns raw documents into records, keeps those at or under `max_years`, and writes them as
/// one batch.
///
/// A document missing a required field, or whose estimate cannot be obtained, is logged and
/// skipped. A failed insert is logged and the whole batch is dropped.
pub async fn persist_stage(
	generator: &dyn TextGenerator,
	sink: &dyn JobSink,
	details: &[(i64, Arc<Value>)],
	job_type: i32,
	max_years: u32,
) -> PersistOutcome {
	let mut outcome = PersistOutcome::default();
	let mut records = Vec::new();

	for (id, raw) in details {
		let detail = match JobDetail::from_value(*id, raw) {
			Ok(detail) => detail,
			Err(err) => {
				tracing::warn!(job_id = id, error = %err, "Skipping job with incomplete detail.");

				outcome.skipped += 1;

				continue;
			},
		};
		let estimate = match enrich(generator, &detail.description).await {
			Ok(estimate) => estimate,
			Err(err) => {
				tracing::warn!(job_id = id, error = %err, "Experience estimate failed.");

				outcome.skipped += 1;

				continue;
			},
		};

		outcome.estimated += 1;

		tracing::debug!(
			job_id = id,
			years = estimate.years,
			source = ?estimate.source,
			"Estimated experience."
		);

		if experience::qualifies(estimate.years, max_years) {
			records.push(JobRecord::new(detail, estimate.years, job_type));
		}
	}

	outcome.qualified = records.len();

	if records.is_empty() {
		return outcome;
	}

	match sink.insert_jobs(&records).await {
		Ok(inserted) => outcome.inserted = inserted,
		Err(err) => {
			tracing::error!(rows = records.len(), error = %err, "Batch insert failed.");

			outcome.insert_failed = true;
		},
	}

	outcome
}
