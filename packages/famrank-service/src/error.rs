pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Search query must be at least {min_len} characters")]
	QueryTooShort { min_len: u32 },
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<famrank_storage::Error> for Error {
	fn from(err: famrank_storage::Error) -> Self {
		match err {
			famrank_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			famrank_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			famrank_storage::Error::NotFound(message) => Self::NotFound { message },
		}
	}
}

impl From<famrank_providers::Error> for Error {
	fn from(err: famrank_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
