pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("Job detail is missing {path}.")]
	MissingField { path: &'static str },
	#[error("Tracking URN {urn:?} does not end in a numeric job id.")]
	InvalidTrackingUrn { urn: String },
}
