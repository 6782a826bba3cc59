pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error(transparent)]
	Domain(#[from] jobscout_domain::Error),
	#[error("Task failed: {message}")]
	Task { message: String },
}
impl From<jobscout_providers::Error> for Error {
	fn from(err: jobscout_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl From<jobscout_storage::Error> for Error {
	fn from(err: jobscout_storage::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}
