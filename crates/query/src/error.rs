use thiserror::Error;

/// A convenient type alias for `Result` with `E` = [`QueryError`].
pub type Result<T, E = QueryError> = std::result::Result<T, E>;

/// Ways a host query can fail.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QueryError {
	/// The request never produced a response.
	#[error("transport failed: {0}")]
	Transport(String),
	/// The response was not the expected shape.
	#[error("deserialization failed: {0}")]
	Decode(#[from] serde_json::Error),
	/// The host answered with a non-zero code.
	#[error("host rejected request with code {code}: {msg}")]
	Rejected { code: i64, msg: String },
}
