pub type Result<T> = std::result::Result<T, Error>;

/// Why a token could not be produced or accepted.
///
/// Every variant is terminal; nothing is retried.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum Error {
	#[error("token expired at {expires_at}")]
	Expired { expires_at: u64 },

	#[error("invalid issuer, expected: {expected}")]
	InvalidIssuer { expected: String, found: Option<String> },

	#[error("invalid audience, expected: {expected}")]
	InvalidAudience { expected: String, found: Option<String> },

	#[error("invalid token: {0}")]
	InvalidToken(String),

	#[error("missing token argument")]
	MissingArgument,

	#[error("JWT_SECRET not configured")]
	UnconfiguredSecret,

	#[error("encode failed: {0}")]
	Encode(String),
}

impl From<jsonwebtoken::errors::Error> for Error {
	fn from(err: jsonwebtoken::errors::Error) -> Self {
		Error::InvalidToken(err.to_string())
	}
}
