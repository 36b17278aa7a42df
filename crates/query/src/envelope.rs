use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};

/// Response envelope shared by every host query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
	pub code: i64,
	#[serde(default, alias = "message")]
	pub msg: String,
	pub data: Option<T>,
}

impl<T> Envelope<T> {
	pub fn is_success(&self) -> bool {
		self.code == 0
	}

	/// Returns the payload on success, [`QueryError::Rejected`] otherwise.
	///
	/// A successful envelope may legitimately carry `null` data.
	pub fn into_result(self) -> Result<Option<T>> {
		if self.is_success() {
			Ok(self.data)
		} else {
			Err(QueryError::Rejected {
				code: self.code,
				msg: self.msg,
			})
		}
	}
}
