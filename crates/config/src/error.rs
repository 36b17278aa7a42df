//! Error types for configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The document is not valid JSON.
	#[error("JSON parse error: {0}")]
	Json(#[from] serde_json::Error),

	/// Error reading or writing a configuration file.
	#[error("I/O error on {path}: {error}")]
	Io {
		/// Path to the file that failed.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The top-level document is not an object.
	#[error("expected a JSON object at the top level, got {0}")]
	NotAnObject(&'static str),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Non-fatal warning produced while merging a saved document over defaults.
///
/// The offending value is dropped and the default is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
	/// A key that the settings schema does not know.
	UnknownKey {
		/// The unrecognized key, dotted for nested blocks.
		key: String,
	},
	/// A known key whose value has the wrong shape.
	InvalidValue {
		/// The key, dotted for nested blocks.
		key: String,
		/// Deserializer message.
		reason: String,
	},
}

impl std::fmt::Display for ConfigWarning {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ConfigWarning::UnknownKey { key } => write!(f, "unknown setting '{key}' ignored"),
			ConfigWarning::InvalidValue { key, reason } => {
				write!(f, "setting '{key}' ignored, default kept ({reason})")
			}
		}
	}
}
