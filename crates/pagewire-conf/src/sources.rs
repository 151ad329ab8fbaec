//! Configuration sources for layered settings
//!
//! Each source yields a flat map of setting name to JSON value. The
//! [`SettingsBuilder`](crate::SettingsBuilder) merges them in priority order.

use serde_json::{Map, Value};
use std::fs;
use std::path::PathBuf;

/// Trait for configuration sources
pub trait ConfigSource: Send + Sync {
	/// Load configuration from this source
	fn load(&self) -> Result<Map<String, Value>, SourceError>;

	/// Get the priority of this source (higher = more important)
	fn priority(&self) -> u8;

	/// Get a description of this source
	fn description(&self) -> String;
}

/// Error type for configuration sources
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
	#[error("IO error reading {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Parse error: {0}")]
	Parse(String),

	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

/// Built-in defaults, lowest priority
#[derive(Debug, Clone, Default)]
pub struct DefaultSource {
	values: Map<String, Value>,
}

impl DefaultSource {
	pub fn new() -> Self {
		Self::default()
	}

	/// Seeds the source from any serializable struct.
	pub fn from_serializable<T: serde::Serialize>(defaults: &T) -> Result<Self, SourceError> {
		match serde_json::to_value(defaults)? {
			Value::Object(values) => Ok(Self { values }),
			_ => Err(SourceError::Parse("Defaults must serialize to an object".to_string())),
		}
	}

	pub fn with_value(mut self, key: impl Into<String>, value: Value) -> Self {
		self.values.insert(key.into(), value);
		self
	}
}

impl ConfigSource for DefaultSource {
	fn load(&self) -> Result<Map<String, Value>, SourceError> {
		Ok(self.values.clone())
	}

	fn priority(&self) -> u8 {
		0
	}

	fn description(&self) -> String {
		"Default values".to_string()
	}
}

/// TOML file configuration source
pub struct TomlFileSource {
	path: PathBuf,
	required: bool,
}

impl TomlFileSource {
	/// A file that is skipped when it does not exist.
	///
	/// # Examples
	///
	/// ```
	/// use pagewire_conf::TomlFileSource;
	///
	/// let source = TomlFileSource::new("pagewire.toml");
	/// ```
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			required: false,
		}
	}

	/// A file that must exist.
	pub fn required(path: impl Into<PathBuf>) -> Self {
		Self {
			path: path.into(),
			required: true,
		}
	}
}

impl ConfigSource for TomlFileSource {
	fn load(&self) -> Result<Map<String, Value>, SourceError> {
		if !self.required && !self.path.exists() {
			return Ok(Map::new());
		}

		let content = fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
			path: self.path.clone(),
			source,
		})?;
		let toml_value: toml::Value = toml::from_str(&content)?;

		match serde_json::to_value(toml_value)? {
			Value::Object(map) => Ok(map),
			_ => Err(SourceError::Parse("Expected table at root".to_string())),
		}
	}

	fn priority(&self) -> u8 {
		50
	}

	fn description(&self) -> String {
		format!("TOML file: {}", self.path.display())
	}
}

/// Environment variable configuration source
///
/// `PAGEWIRE_SESSION_TTL_SECS=60` becomes `session_ttl_secs = "60"`. Values
/// are loaded as strings and coerced to the type of the setting they
/// override when sources are merged.
pub struct EnvSource {
	prefix: String,
}

impl EnvSource {
	/// Source reading variables that start with `prefix`.
	///
	/// # Examples
	///
	/// ```
	/// use pagewire_conf::EnvSource;
	///
	/// let source = EnvSource::with_prefix("PAGEWIRE_");
	/// ```
	pub fn with_prefix(prefix: impl Into<String>) -> Self {
		Self {
			prefix: prefix.into(),
		}
	}
}

impl Default for EnvSource {
	fn default() -> Self {
		Self::with_prefix("PAGEWIRE_")
	}
}

impl ConfigSource for EnvSource {
	fn load(&self) -> Result<Map<String, Value>, SourceError> {
		Ok(std::env::vars()
			.filter_map(|(key, value)| {
				let name = key.strip_prefix(&self.prefix)?;
				(!name.is_empty()).then(|| (name.to_lowercase(), Value::String(value)))
			})
			.collect())
	}

	fn priority(&self) -> u8 {
		100 // Highest priority
	}

	fn description(&self) -> String {
		format!("Environment variables (prefix: {})", self.prefix)
	}
}
