use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

// Range first so `3-5` yields its lower bound through the `low` group. A bare integer with an
// optional trailing `+` is the fallback alternative.
const YEARS_PATTERN: &str = r"\b(?P<low>[0-9]+)\s*-\s*[0-9]+\b|\b(?P<single>[0-9]+)\+?";

static YEARS_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(YEARS_PATTERN).ok());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateSource {
	/// The model answered with a bare integer.
	Direct,
	/// A number was pulled out of a free-form answer.
	Pattern,
	/// No number anywhere in the answer.
	Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExperienceEstimate {
	pub years: u32,
	pub source: EstimateSource,
}

pub fn experience_prompt(description: &str) -> String {
	format!(
		"You are an intelligent job experience provider. Provide the minimum experience required \
		 for the job described below in years (only the number):\nJob Description: {description}\n"
	)
}

/// Interprets a model answer, preferring a bare integer and falling back to
/// [`extract_years`].
pub fn estimate_from_response(text: &str) -> ExperienceEstimate {
	if let Some(years) = parse_direct(text) {
		return ExperienceEstimate { years, source: EstimateSource::Direct };
	}

	match find_years(text) {
		Some(years) => ExperienceEstimate { years, source: EstimateSource::Pattern },
		None => ExperienceEstimate { years: 0, source: EstimateSource::Default },
	}
}

/// Parses the trimmed text as a non-negative integer.
pub fn parse_direct(text: &str) -> Option<u32> {
	let value = text.trim().parse::<i64>().ok()?;

	u32::try_from(value).ok()
}

/// First year count in `text`: the lower bound of a range `A-B`, a bare `N`, or `N+`.
/// Returns 0 when the text holds no number.
pub fn extract_years(text: &str) -> u32 {
	find_years(text).unwrap_or(0)
}

pub fn qualifies(years: u32, max_years: u32) -> bool {
	years <= max_years
}

fn find_years(text: &str) -> Option<u32> {
	let re = YEARS_RE.as_ref()?;
	let caps = re.captures(text)?;
	let digits = caps.name("low").or_else(|| caps.name("single"))?.as_str();

	// Only ASCII digits reach here, so the sole parse failure is overflow.
	Some(digits.parse::<u32>().unwrap_or(u32::MAX))
}
