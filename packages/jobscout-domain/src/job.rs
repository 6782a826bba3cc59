use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

const COMPANY_PATH: &[&str] = &[
	"companyDetails",
	"com.linkedin.voyager.deco.jobs.web.shared.WebCompactJobPostingCompany",
	"companyResolutionResult",
	"name",
];
const APPLY_URL_PATH: &[&str] =
	&["applyMethod", "com.linkedin.voyager.jobs.OffsiteApply", "companyApplyUrl"];
const DESCRIPTION_PATH: &[&str] = &["description", "text"];
const TITLE_PATH: &[&str] = &["title"];

/// Search hit. Only the tracking URN is needed to fetch the full posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
	#[serde(rename = "trackingUrn")]
	pub tracking_urn: String,
}
impl JobSummary {
	pub fn new(tracking_urn: impl Into<String>) -> Self {
		Self { tracking_urn: tracking_urn.into() }
	}

	pub fn job_id(&self) -> Result<i64> {
		resolve_job_id(&self.tracking_urn)
	}
}

/// Extracts the numeric id from a URN such as `urn:li:jobPosting:3912345678`.
pub fn resolve_job_id(urn: &str) -> Result<i64> {
	let tail = urn.rsplit(':').next().unwrap_or(urn).trim();

	tail.parse::<i64>().map_err(|_| Error::InvalidTrackingUrn { urn: urn.to_string() })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobDetail {
	pub id: i64,
	pub url: String,
	pub title: String,
	pub company: String,
	pub description: String,
}
impl JobDetail {
	/// Builds a typed posting from the provider's raw job document.
	///
	/// Fails with the path of the first field that is absent or not a string. Field order
	/// matches the order the persistence stage historically read them in: company, apply URL,
	/// description, title.
	pub fn from_value(id: i64, raw: &Value) -> Result<Self> {
		let company = string_at(raw, COMPANY_PATH, "companyDetails.companyResolutionResult.name")?;
		let url = string_at(raw, APPLY_URL_PATH, "applyMethod.OffsiteApply.companyApplyUrl")?;
		let description = string_at(raw, DESCRIPTION_PATH, "description.text")?;
		let title = string_at(raw, TITLE_PATH, "title")?;

		Ok(Self { id, url, title, company, description })
	}
}

/// One row of the jobs table, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobRecord {
	pub id: i64,
	pub url: String,
	pub role: String,
	pub company: String,
	pub description: String,
	pub experience: u32,
	pub job_type: i32,
}
impl JobRecord {
	pub fn new(detail: JobDetail, experience: u32, job_type: i32) -> Self {
		Self {
			id: detail.id,
			url: detail.url,
			role: detail.title,
			company: detail.company,
			description: detail.description,
			experience,
			job_type,
		}
	}
}

fn string_at(raw: &Value, path: &[&str], label: &'static str) -> Result<String> {
	path.iter()
		.try_fold(raw, |node, key| node.get(key))
		.and_then(Value::as_str)
		.map(str::to_string)
		.ok_or(Error::MissingField { path: label })
}
