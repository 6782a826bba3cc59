pub mod genai;
pub mod linkedin;

mod error;

pub use error::{Error, Result};

use std::time::Duration;

use reqwest::{Client, ClientBuilder};

/// Client builder with the per-call timeout every provider request must honor.
pub fn client_builder(timeout_ms: u64) -> ClientBuilder {
	Client::builder().timeout(Duration::from_millis(timeout_ms))
}

/// Shortens a provider body for error messages.
pub(crate) fn snippet(body: &str) -> String {
	const MAX_CHARS: usize = 200;

	let mut out: String = body.chars().take(MAX_CHARS).collect();

	if body.chars().count() > MAX_CHARS {
		out.push('…');
	}

	out
}
