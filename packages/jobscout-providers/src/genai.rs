use reqwest::{
	Client,
	header::{HeaderMap, HeaderValue},
};
use serde_json::Value;

use jobscout_config::GenaiProviderConfig;

use crate::{Error, Result};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Single-shot text completion against the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GenaiClient {
	http: Client,
	url: String,
}
impl GenaiClient {
	pub fn new(cfg: &GenaiProviderConfig) -> Result<Self> {
		let mut headers = HeaderMap::new();
		let mut key = HeaderValue::from_str(cfg.api_key.expose())?;

		key.set_sensitive(true);
		headers.insert(API_KEY_HEADER, key);

		let http = crate::client_builder(cfg.timeout_ms).default_headers(headers).build()?;
		let url = format!("{}/v1beta/models/{}:generateContent", cfg.api_base, cfg.model);

		Ok(Self { http, url })
	}

	pub async fn generate(&self, prompt: &str) -> Result<String> {
		let body = serde_json::json!({
			"contents": [
				{ "role": "user", "parts": [{ "text": prompt }] }
			],
		});
		let res = self.http.post(&self.url).json(&body).send().await?;
		let json: Value = res.error_for_status()?.json().await?;

		parse_generate_response(&json)
	}
}

fn parse_generate_response(json: &Value) -> Result<String> {
	if let Some(reason) = json.pointer("/promptFeedback/blockReason").and_then(Value::as_str) {
		return Err(Error::InvalidResponse {
			message: format!("Generation was blocked: {reason}."),
		});
	}

	let parts = json
		.pointer("/candidates/0/content/parts")
		.and_then(Value::as_array)
		.ok_or_else(|| Error::InvalidResponse {
			message: "Generation response is missing candidate parts.".to_string(),
		})?;
	let text: String =
		parts.iter().filter_map(|part| part.get("text")).filter_map(Value::as_str).collect();

	if text.is_empty() {
		return Err(Error::InvalidResponse {
			message: format!(
				"Generation response has no text: {}",
				crate::snippet(&json.to_string())
			),
		});
	}

	Ok(text)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn joins_candidate_text_parts() {
		let json = serde_json::json!({
			"candidates": [
				{ "content": { "parts": [{ "text": "1" }, { "text": "\n" }] } },
				{ "content": { "parts": [{ "text": "9" }] } }
			]
		});

		assert_eq!(parse_generate_response(&json).expect("parse failed"), "1\n");
	}

	#[test]
	fn blocked_prompt_is_an_error() {
		let json = serde_json::json!({ "promptFeedback": { "blockReason": "SAFETY" } });
		let err = parse_generate_response(&json).expect_err("expected error");

		assert!(err.to_string().contains("SAFETY"));
	}

	#[test]
	fn missing_candidates_is_an_error() {
		let json = serde_json::json!({ "candidates": [] });

		assert!(matches!(parse_generate_response(&json), Err(Error::InvalidResponse { .. })));
	}
}
