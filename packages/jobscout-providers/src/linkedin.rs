use std::sync::Arc;

use reqwest::{
	Client, StatusCode, Url,
	cookie::{CookieStore, Jar},
	header::{self, HeaderMap, HeaderValue},
};
use serde_json::Value;
use uuid::Uuid;

use jobscout_config::{LinkedinProviderConfig, Search};
use jobscout_domain::JobSummary;

use crate::{Error, Result};

const SEARCH_DECORATION: &str =
	"com.linkedin.voyager.dash.deco.jobs.search.JobSearchCardsCollection-174";
const DETAIL_DECORATION: &str = "com.linkedin.voyager.deco.jobs.web.shared.WebFullJobPosting-65";
const DETAIL_FLAVORS: &str = "List(TOP_APPLICANT,IN_NETWORK,COMPANY_RECRUIT,SCHOOL_RECRUIT,HIDDEN_GEM,ACTIVELY_HIRING_COMPANY)";
const JOB_POSTING_TYPE: &str = "com.linkedin.voyager.dash.jobs.JobPosting";
const NORMALIZED_JSON: &str = "application/vnd.linkedin.normalized+json+2.1";

/// One keyword search: filters plus paging bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobQuery {
	pub keywords: String,
	pub location: String,
	pub employment_type: String,
	pub recency_secs: u64,
	pub page_size: u32,
	pub max_results: u32,
}
impl JobQuery {
	pub fn from_search(search: &Search, keywords: &str) -> Self {
		Self {
			keywords: keywords.to_string(),
			location: search.location.clone(),
			employment_type: search.employment_type.clone(),
			recency_secs: search.recency_secs,
			page_size: search.page_size,
			max_results: search.max_results,
		}
	}

	/// Rest.li `query` value. Free text is percent-encoded; the structural `(),:` stay literal.
	fn restli_query(&self) -> String {
		format!(
			"(origin:JOB_SEARCH_PAGE_QUERY_EXPANSION,keywords:{},locationFallback:{},selectedFilters:(jobType:List({}),timePostedRange:List(r{})),spellCorrectionEnabled:true)",
			urlencoding::encode(&self.keywords),
			urlencoding::encode(&self.location),
			urlencoding::encode(&self.employment_type),
			self.recency_secs,
		)
	}
}

#[derive(Debug, Default)]
struct SearchPage {
	summaries: Vec<JobSummary>,
	total: Option<u64>,
}

/// Authenticated voyager session. Cheap to clone; clones share the cookie jar.
#[derive(Clone)]
pub struct LinkedinClient {
	http: Client,
	api_base: String,
}
impl LinkedinClient {
	/// Signs in with username and password and keeps the session cookies for later calls.
	pub async fn login(cfg: &LinkedinProviderConfig) -> Result<Self> {
		let base = Url::parse(&cfg.api_base).map_err(|err| Error::InvalidResponse {
			message: format!("Invalid LinkedIn api_base {:?}: {err}", cfg.api_base),
		})?;
		let jar = Arc::new(Jar::default());
		let mut headers = HeaderMap::new();

		headers.insert(header::USER_AGENT, HeaderValue::from_str(&cfg.user_agent)?);
		headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
		headers.insert("x-li-lang", HeaderValue::from_static("en_US"));
		headers.insert("x-restli-protocol-version", HeaderValue::from_static("2.0.0"));

		let bootstrap = crate::client_builder(cfg.timeout_ms)
			.cookie_provider(jar.clone())
			.default_headers(headers.clone())
			.build()?;
		let auth_url = format!("{}/uas/authenticate", cfg.api_base);

		// Seeds the jar with the session cookies LinkedIn expects on the login post.
		bootstrap.get(&auth_url).send().await?;

		let session_id = session_cookie(&jar, &base).unwrap_or_else(|| {
			let generated = generate_session_id();

			jar.add_cookie_str(
				&format!("JSESSIONID=\"{generated}\"; Path=/"),
				&base,
			);

			generated
		});
		let csrf = HeaderValue::from_str(&session_id)?;
		let res = bootstrap
			.post(&auth_url)
			.header("csrf-token", csrf.clone())
			.form(&[
				("session_key", cfg.username.as_str()),
				("session_password", cfg.password.expose()),
				("JSESSIONID", session_id.as_str()),
			])
			.send()
			.await?;

		if res.status() == StatusCode::UNAUTHORIZED {
			return Err(Error::Auth { message: "LinkedIn rejected the credentials.".to_string() });
		}

		let body: Value = res.error_for_status()?.json().await?;

		check_login_result(&body)?;

		headers.insert("csrf-token", csrf);

		let http = crate::client_builder(cfg.timeout_ms)
			.cookie_provider(jar)
			.default_headers(headers)
			.build()?;

		tracing::info!(username = %cfg.username, "LinkedIn session established.");

		Ok(Self { http, api_base: format!("{}/voyager/api", cfg.api_base) })
	}

	/// Pages through search results until a page comes back empty, the reported total is
	/// reached, or `max_results` summaries were collected.
	pub async fn search_jobs(&self, query: &JobQuery) -> Result<Vec<JobSummary>> {
		let limit = query.max_results as usize;
		let mut results: Vec<JobSummary> = Vec::new();

		loop {
			let start = results.len();
			let url = format!(
				"{}/voyagerJobsDashJobCards?decorationId={SEARCH_DECORATION}&count={}&q=jobSearch&query={}&start={start}",
				self.api_base,
				query.page_size,
				query.restli_query(),
			);
			let res = self.http.get(&url).header(header::ACCEPT, NORMALIZED_JSON).send().await?;
			let json: Value = res.error_for_status()?.json().await?;
			let page = parse_search_page(&json);

			tracing::debug!(
				keywords = %query.keywords,
				start,
				page_len = page.summaries.len(),
				total = ?page.total,
				"Fetched search page."
			);

			if page.summaries.is_empty() {
				break;
			}

			results.extend(page.summaries);

			if results.len() >= limit {
				results.truncate(limit);

				break;
			}
			if page.total.is_some_and(|total| results.len() as u64 >= total) {
				break;
			}
		}

		Ok(results)
	}

	/// Full posting document for one job id.
	pub async fn get_job(&self, job_id: i64) -> Result<Value> {
		let url = format!(
			"{}/jobs/jobPostings/{job_id}?decorationId={DETAIL_DECORATION}&topN=1&topNRequestedFlavors={DETAIL_FLAVORS}",
			self.api_base,
		);
		let res = self.http.get(&url).send().await?;
		let status = res.status();

		if !status.is_success() {
			let body = res.text().await.unwrap_or_default();

			return Err(Error::InvalidResponse {
				message: format!("Job {job_id} fetch returned {status}: {}", crate::snippet(&body)),
			});
		}

		Ok(res.json().await?)
	}
}

fn session_cookie(jar: &Jar, url: &Url) -> Option<String> {
	let cookies = jar.cookies(url)?;
	let raw = cookies.to_str().ok()?;

	raw.split(';').find_map(|pair| {
		let (name, value) = pair.trim().split_once('=')?;

		(name == "JSESSIONID").then(|| value.trim_matches('"').to_string())
	})
}

fn generate_session_id() -> String {
	format!("ajax:{:019}", Uuid::new_v4().as_u128() % 10_u128.pow(19))
}

fn check_login_result(body: &Value) -> Result<()> {
	match body.get("login_result").and_then(Value::as_str) {
		Some("PASS") => Ok(()),
		Some(other) => Err(Error::Auth { message: format!("LinkedIn login result was {other}.") }),
		None => Err(Error::Auth {
			message: format!(
				"LinkedIn login response had no result: {}",
				crate::snippet(&body.to_string())
			),
		}),
	}
}

fn parse_search_page(json: &Value) -> SearchPage {
	let summaries = json
		.get("included")
		.and_then(Value::as_array)
		.map(|items| {
			items
				.iter()
				.filter(|item| item.get("$type").and_then(Value::as_str) == Some(JOB_POSTING_TYPE))
				.filter_map(|item| item.get("trackingUrn").and_then(Value::as_str))
				.map(JobSummary::new)
				.collect()
		})
		.unwrap_or_default();
	let total = json.pointer("/data/paging/total").and_then(Value::as_u64);

	SearchPage { summaries, total }
}

#[cfg(test)]
mod tests {
	use super::*;

	fn query() -> JobQuery {
		JobQuery {
			keywords: "Software Engineer".to_string(),
			location: "United States".to_string(),
			employment_type: "F".to_string(),
			recency_secs: 86_400,
			page_size: 25,
			max_results: 100,
		}
	}

	#[test]
	fn restli_query_encodes_free_text_only() {
		let rendered = query().restli_query();

		assert!(rendered.starts_with("(origin:JOB_SEARCH_PAGE_QUERY_EXPANSION,"));
		assert!(rendered.contains("keywords:Software%20Engineer,"));
		assert!(rendered.contains("locationFallback:United%20States,"));
		assert!(rendered.contains("selectedFilters:(jobType:List(F),timePostedRange:List(r86400))"));
	}

	#[test]
	fn keeps_only_job_postings_with_tracking_urn() {
		let json = serde_json::json!({
			"data": { "paging": { "total": 2, "start": 0, "count": 25 } },
			"included": [
				{ "$type": JOB_POSTING_TYPE, "trackingUrn": "urn:li:jobPosting:1" },
				{ "$type": "com.linkedin.voyager.dash.organization.Company", "trackingUrn": "x" },
				{ "$type": JOB_POSTING_TYPE },
				{ "$type": JOB_POSTING_TYPE, "trackingUrn": "urn:li:jobPosting:2" }
			]
		});
		let page = parse_search_page(&json);

		assert_eq!(
			page.summaries,
			vec![JobSummary::new("urn:li:jobPosting:1"), JobSummary::new("urn:li:jobPosting:2")]
		);
		assert_eq!(page.total, Some(2));
	}

	#[test]
	fn empty_page_has_no_summaries() {
		let page = parse_search_page(&serde_json::json!({ "data": {} }));

		assert!(page.summaries.is_empty());
		assert_eq!(page.total, None);
	}

	#[test]
	fn login_requires_pass() {
		assert!(check_login_result(&serde_json::json!({ "login_result": "PASS" })).is_ok());
		assert!(matches!(
			check_login_result(&serde_json::json!({ "login_result": "CHALLENGE" })),
			Err(Error::Auth { .. })
		));
		assert!(check_login_result(&serde_json::json!({})).is_err());
	}

	#[test]
	fn generated_session_id_has_ajax_prefix() {
		let id = generate_session_id();

		assert!(id.starts_with("ajax:"));
		assert_eq!(id.len(), "ajax:".len() + 19);
	}

	#[test]
	fn reads_session_cookie_from_jar() {
		let jar = Jar::default();
		let url = Url::parse("https://www.linkedin.com").expect("url");

		jar.add_cookie_str("JSESSIONID=\"ajax:123\"; Domain=.linkedin.com; Path=/", &url);
		jar.add_cookie_str("bcookie=abc; Domain=.linkedin.com; Path=/", &url);

		assert_eq!(session_cookie(&jar, &url).as_deref(), Some("ajax:123"));
	}
}
