use replydesk_domain::lead::{ParseEnumError, TransitionError};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Unauthorized: {message}")]
	Unauthorized { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<replydesk_storage::Error> for Error {
	fn from(err: replydesk_storage::Error) -> Self {
		match err {
			replydesk_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			replydesk_storage::Error::Conflict(message) => Self::Conflict { message },
		}
	}
}

impl From<replydesk_providers::Error> for Error {
	fn from(err: replydesk_providers::Error) -> Self {
		match err {
			replydesk_providers::Error::Unauthorized =>
				Self::Unauthorized { message: "Access token was rejected.".to_string() },
			other => Self::Provider { message: other.to_string() },
		}
	}
}

impl From<TransitionError> for Error {
	fn from(err: TransitionError) -> Self {
		Self::Conflict { message: err.to_string() }
	}
}

impl From<ParseEnumError> for Error {
	fn from(err: ParseEnumError) -> Self {
		Self::Storage { message: err.to_string() }
	}
}
