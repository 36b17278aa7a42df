//! Persisted settings for the margin outline.
//!
//! Settings live in a flat JSON document (`config.json`) owned by the host.
//! A saved document may be partial, stale or hand-edited, so loading always
//! starts from [`PluginConfig::default`] and overlays whatever the saved
//! document provides:
//!
//! - Top-level keys replace the default value wholesale.
//! - `fullscreenConfig` is merged one level deep, so a saved block with a
//!   single toggle keeps the defaults for every other toggle.
//! - Unknown keys and values of the wrong shape are dropped and reported as
//!   [`ConfigWarning`]s rather than failing the load.
//!
//! ```json
//! {
//!     "dockSide": "left",
//!     "toolbarConfig": ["refreshDoc", "togglePin"],
//!     "fullscreenConfig": { "enableMermaid": false }
//! }
//! ```

pub mod error;
mod settings;

use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, warn};

pub use error::{ConfigError, ConfigWarning, Result};
pub use settings::{ButtonPosition, DockSide, FullscreenConfig, PluginConfig, ToolbarAction};
use settings::{FULLSCREEN_KEY, TOP_LEVEL_KEYS};

/// Settings merged from a saved document, plus whatever was dropped on the way.
#[derive(Debug, Clone, Default)]
pub struct ParsedConfig {
	/// Effective settings.
	pub config: PluginConfig,
	/// Non-fatal problems found in the saved document.
	pub warnings: Vec<ConfigWarning>,
}

impl PluginConfig {
	/// Parses a saved JSON document and merges it over the defaults.
	pub fn parse(input: &str) -> Result<ParsedConfig> {
		let saved: Value = serde_json::from_str(input)?;
		Self::merge_saved(&saved)
	}

	/// Merges an already decoded saved document over the defaults.
	///
	/// `null` is treated as "nothing saved".
	pub fn merge_saved(saved: &Value) -> Result<ParsedConfig> {
		let saved = match saved {
			Value::Null => return Ok(ParsedConfig::default()),
			Value::Object(map) => map,
			other => return Err(ConfigError::NotAnObject(json_kind(other))),
		};

		let defaults = serde_json::to_value(PluginConfig::default())?;
		let mut merged = match defaults.clone() {
			Value::Object(map) => map,
			_ => Map::new(),
		};
		let mut warnings = Vec::new();

		for (key, value) in saved {
			if !TOP_LEVEL_KEYS.contains(&key.as_str()) {
				warnings.push(ConfigWarning::UnknownKey { key: key.clone() });
				continue;
			}
			if value.is_null() {
				continue;
			}

			let candidate = if key == FULLSCREEN_KEY {
				match value {
					Value::Object(block) => {
						merge_fullscreen(&defaults[FULLSCREEN_KEY], block, &mut warnings)
					}
					other => other.clone(),
				}
			} else {
				value.clone()
			};

			match probe_key(&defaults, key, &candidate) {
				Ok(()) => {
					merged.insert(key.clone(), candidate);
				}
				Err(reason) => warnings.push(ConfigWarning::InvalidValue {
					key: key.clone(),
					reason,
				}),
			}
		}

		let config: PluginConfig = serde_json::from_value(Value::Object(merged))?;
		for warning in &warnings {
			warn!(%warning, "config.merge_warning");
		}
		Ok(ParsedConfig { config, warnings })
	}

	/// Loads settings from a file.
	///
	/// A missing file yields the defaults; the host has simply never saved.
	pub fn load(path: impl AsRef<Path>) -> Result<ParsedConfig> {
		let path = path.as_ref();
		let content = match std::fs::read_to_string(path) {
			Ok(content) => content,
			Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
				debug!(path = %path.display(), "config.load_missing");
				return Ok(ParsedConfig::default());
			}
			Err(error) => {
				return Err(ConfigError::Io {
					path: path.to_path_buf(),
					error,
				});
			}
		};
		Self::parse(&content)
	}

	/// Writes the full settings document to `path`.
	pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
		let path = path.as_ref();
		let content = serde_json::to_string_pretty(self)?;
		std::fs::write(path, content).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})
	}
}

/// Overlays a saved fullscreen block onto the default block key by key.
fn merge_fullscreen(
	defaults: &Value,
	saved: &Map<String, Value>,
	warnings: &mut Vec<ConfigWarning>,
) -> Value {
	let mut block = match defaults {
		Value::Object(map) => map.clone(),
		_ => Map::new(),
	};
	for (key, value) in saved {
		let dotted = format!("{FULLSCREEN_KEY}.{key}");
		if !block.contains_key(key) {
			warnings.push(ConfigWarning::UnknownKey { key: dotted });
			continue;
		}
		if value.is_null() {
			continue;
		}
		let mut probe = block.clone();
		probe.insert(key.clone(), value.clone());
		match serde_json::from_value::<FullscreenConfig>(Value::Object(probe)) {
			Ok(_) => {
				block.insert(key.clone(), value.clone());
			}
			Err(err) => warnings.push(ConfigWarning::InvalidValue {
				key: dotted,
				reason: err.to_string(),
			}),
		}
	}
	Value::Object(block)
}

/// Checks that `value` deserializes in place of `key` with every other key at its default.
fn probe_key(defaults: &Value, key: &str, value: &Value) -> std::result::Result<(), String> {
	let mut probe = defaults.clone();
	probe[key] = value.clone();
	serde_json::from_value::<PluginConfig>(probe)
		.map(|_| ())
		.map_err(|err| err.to_string())
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}
