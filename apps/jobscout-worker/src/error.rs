pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Config(#[from] jobscout_config::Error),
	#[error(transparent)]
	Storage(#[from] jobscout_storage::Error),
	#[error(transparent)]
	Provider(#[from] jobscout_providers::Error),
}
