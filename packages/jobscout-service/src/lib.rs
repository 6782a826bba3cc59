pub mod cache;
pub mod pipeline;
pub mod pool;
pub mod stages;

mod error;

pub use cache::{DetailCache, MemoCache};
pub use error::{Error, Result};
pub use pipeline::{KeywordReport, Pipeline, RunReport};
pub use pool::WorkerPool;

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use jobscout_domain::{JobRecord, JobSummary};
use jobscout_providers::{
	genai::GenaiClient,
	linkedin::{JobQuery, LinkedinClient},
};
use jobscout_storage::{db::Db, jobs};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait JobSearchProvider
where
	Self: Send + Sync,
{
	fn search_jobs<'a>(&'a self, query: &'a JobQuery) -> BoxFuture<'a, Result<Vec<JobSummary>>>;

	fn get_job(&self, job_id: i64) -> BoxFuture<'_, Result<Value>>;
}

pub trait TextGenerator
where
	Self: Send + Sync,
{
	fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String>>;
}

/// Destination for one keyword's qualifying records. One call is one all-or-nothing batch.
pub trait JobSink
where
	Self: Send + Sync,
{
	fn insert_jobs<'a>(&'a self, records: &'a [JobRecord]) -> BoxFuture<'a, Result<u64>>;
}

#[derive(Clone)]
pub struct Providers {
	pub search: Arc<dyn JobSearchProvider>,
	pub generator: Arc<dyn TextGenerator>,
	pub sink: Arc<dyn JobSink>,
}
impl Providers {
	pub fn new(
		search: Arc<dyn JobSearchProvider>,
		generator: Arc<dyn TextGenerator>,
		sink: Arc<dyn JobSink>,
	) -> Self {
		Self { search, generator, sink }
	}
}

/// Writes batches into one MySQL table.
pub struct TableSink {
	db: Arc<Db>,
	table: String,
	chunk_rows: usize,
}
impl TableSink {
	pub fn new(db: Arc<Db>, table: impl Into<String>, chunk_rows: usize) -> Self {
		Self { db, table: table.into(), chunk_rows }
	}
}

impl JobSearchProvider for LinkedinClient {
	fn search_jobs<'a>(&'a self, query: &'a JobQuery) -> BoxFuture<'a, Result<Vec<JobSummary>>> {
		Box::pin(async move { Ok(LinkedinClient::search_jobs(self, query).await?) })
	}

	fn get_job(&self, job_id: i64) -> BoxFuture<'_, Result<Value>> {
		Box::pin(async move { Ok(LinkedinClient::get_job(self, job_id).await?) })
	}
}

impl TextGenerator for GenaiClient {
	fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String>> {
		Box::pin(async move { Ok(GenaiClient::generate(self, prompt).await?) })
	}
}

impl JobSink for TableSink {
	fn insert_jobs<'a>(&'a self, records: &'a [JobRecord]) -> BoxFuture<'a, Result<u64>> {
		Box::pin(async move {
			Ok(jobs::insert_jobs(&self.db, &self.table, records, self.chunk_rows).await?)
		})
	}
}
