use jobscout_config::{GenaiProviderConfig, Search, Secret};
use jobscout_providers::{genai::GenaiClient, linkedin::JobQuery};

#[test]
fn job_query_copies_search_filters() {
	let search = Search::default();
	let query = JobQuery::from_search(&search, "Backend");

	assert_eq!(query.keywords, "Backend");
	assert_eq!(query.location, "United States");
	assert_eq!(query.employment_type, "F");
	assert_eq!(query.recency_secs, 86_400);
	assert_eq!(query.max_results, search.max_results);
}

#[test]
fn genai_client_builds_with_api_key() {
	let cfg = GenaiProviderConfig { api_key: Secret::new("key"), ..GenaiProviderConfig::default() };

	assert!(GenaiClient::new(&cfg).is_ok());
}

#[test]
fn genai_client_rejects_header_unsafe_key() {
	let cfg =
		GenaiProviderConfig { api_key: Secret::new("bad\nkey"), ..GenaiProviderConfig::default() };

	assert!(GenaiClient::new(&cfg).is_err());
}
