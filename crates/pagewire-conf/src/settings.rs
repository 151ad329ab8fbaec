//! Application settings.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::sources::{ConfigSource, DefaultSource, EnvSource, SourceError, TomlFileSource};

/// Which route table the application serves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteSet {
	/// Home, dashboard and the login/register/logout flow.
	Auth,
	/// The `/about` demo page only.
	Demo,
	/// Both tables.
	#[default]
	Full,
}

impl RouteSet {
	pub fn as_str(&self) -> &'static str {
		match self {
			RouteSet::Auth => "auth",
			RouteSet::Demo => "demo",
			RouteSet::Full => "full",
		}
	}
}

impl fmt::Display for RouteSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for RouteSet {
	type Err = SettingsError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"auth" => Ok(RouteSet::Auth),
			"demo" => Ok(RouteSet::Demo),
			"full" => Ok(RouteSet::Full),
			other => Err(SettingsError::Invalid {
				field: "route_set",
				message: format!("unknown route set '{other}' (expected auth, demo or full)"),
			}),
		}
	}
}

/// Errors raised while loading or validating settings.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	#[error("Failed to load {description}: {source}")]
	Source {
		description: String,
		#[source]
		source: SourceError,
	},

	#[error("Invalid settings: {0}")]
	Deserialize(#[from] serde_json::Error),

	#[error("Invalid value for '{field}': {message}")]
	Invalid { field: &'static str, message: String },
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Socket address the server listens on.
	pub bind: String,
	pub route_set: RouteSet,
	/// Asset version sent with every page object.
	pub asset_version: String,
	/// Prefix of every document title.
	pub app_name: String,
	/// `tracing-subscriber` filter directive; `RUST_LOG` takes precedence.
	pub log_filter: String,
	/// Directory holding the page components. Without it the built-in page
	/// list is registered.
	pub pages_dir: Option<PathBuf>,
	pub session_cookie_secure: bool,
	pub session_ttl_secs: u64,
	/// Where anonymous callers of authenticated routes are sent.
	pub login_url: String,
	/// Where signed-in callers of guest routes are sent.
	pub home_url: String,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			bind: "127.0.0.1:8000".to_string(),
			route_set: RouteSet::default(),
			asset_version: "1".to_string(),
			app_name: "My App".to_string(),
			log_filter: "info".to_string(),
			pages_dir: None,
			session_cookie_secure: false,
			session_ttl_secs: 2 * 60 * 60,
			login_url: "/login".to_string(),
			home_url: "/dashboard".to_string(),
		}
	}
}

impl Settings {
	pub fn builder() -> SettingsBuilder {
		SettingsBuilder::new()
	}

	/// Defaults, then `config_file` (required when given), then `PAGEWIRE_*`.
	///
	/// # Errors
	///
	/// Returns [`SettingsError`] when a source cannot be read or the merged
	/// result does not validate.
	pub fn load(config_file: Option<&Path>) -> Result<Self, SettingsError> {
		let defaults = DefaultSource::from_serializable(&Self::default()).map_err(|source| {
			SettingsError::Source {
				description: "Default values".to_string(),
				source,
			}
		})?;
		let mut builder = Self::builder().add_source(defaults);
		if let Some(path) = config_file {
			builder = builder.add_source(TomlFileSource::required(path));
		}
		builder.add_source(EnvSource::default()).build()
	}

	pub fn socket_addr(&self) -> Result<SocketAddr, SettingsError> {
		self.bind.parse().map_err(|e| SettingsError::Invalid {
			field: "bind",
			message: format!("'{}' is not a socket address: {e}", self.bind),
		})
	}

	/// Checks cross-field constraints serde cannot express.
	pub fn validate(&self) -> Result<(), SettingsError> {
		self.socket_addr()?;
		if self.session_ttl_secs == 0 {
			return Err(SettingsError::Invalid {
				field: "session_ttl_secs",
				message: "must be greater than zero".to_string(),
			});
		}
		if self.asset_version.is_empty() {
			return Err(SettingsError::Invalid {
				field: "asset_version",
				message: "must not be empty".to_string(),
			});
		}
		for (field, url) in [("login_url", &self.login_url), ("home_url", &self.home_url)] {
			if !url.starts_with('/') {
				return Err(SettingsError::Invalid {
					field,
					message: format!("'{url}' must be an absolute path"),
				});
			}
		}
		if let Some(dir) = &self.pages_dir
			&& !dir.is_dir()
		{
			return Err(SettingsError::Invalid {
				field: "pages_dir",
				message: format!("'{}' is not a directory", dir.display()),
			});
		}
		Ok(())
	}
}

/// Merges configuration sources into [`Settings`].
#[derive(Default)]
pub struct SettingsBuilder {
	sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_source(mut self, source: impl ConfigSource + 'static) -> Self {
		self.sources.push(Box::new(source));
		self
	}

	/// Merges every source, lowest priority first, then validates.
	pub fn build(mut self) -> Result<Settings, SettingsError> {
		self.sources.sort_by_key(|source| source.priority());

		let mut merged = Map::new();
		for source in &self.sources {
			let values = source.load().map_err(|source_err| SettingsError::Source {
				description: source.description(),
				source: source_err,
			})?;
			tracing::debug!(source = %source.description(), keys = values.len(), "Loaded settings source");
			for (key, value) in values {
				let value = coerce(value, merged.get(&key));
				merged.insert(key, value);
			}
		}

		let settings: Settings = serde_json::from_value(Value::Object(merged))?;
		settings.validate()?;
		Ok(settings)
	}
}

/// Environment strings take the type of the value they override.
fn coerce(value: Value, existing: Option<&Value>) -> Value {
	let Value::String(raw) = &value else {
		return value;
	};
	match existing {
		Some(Value::Bool(_)) => match raw.trim().to_ascii_lowercase().as_str() {
			"true" | "1" | "yes" | "on" => Value::Bool(true),
			"false" | "0" | "no" | "off" => Value::Bool(false),
			_ => value,
		},
		Some(Value::Number(_)) => raw
			.trim()
			.parse::<u64>()
			.map(Value::from)
			.unwrap_or(value),
		_ => value,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("auth", RouteSet::Auth)]
	#[case("Demo", RouteSet::Demo)]
	#[case(" full ", RouteSet::Full)]
	fn test_route_set_from_str(#[case] input: &str, #[case] expected: RouteSet) {
		assert_eq!(input.parse::<RouteSet>().unwrap(), expected);
	}

	#[rstest]
	fn test_unknown_route_set() {
		assert!(matches!(
			"admin".parse::<RouteSet>(),
			Err(SettingsError::Invalid { field: "route_set", .. })
		));
	}

	#[rstest]
	#[case(Value::from("on"), Some(Value::Bool(false)), Value::Bool(true))]
	#[case(Value::from("60"), Some(Value::from(7200)), Value::from(60))]
	#[case(Value::from("60"), Some(Value::from("1")), Value::from("60"))]
	#[case(Value::from("sixty"), Some(Value::from(7200)), Value::from("sixty"))]
	#[case(Value::from("/srv/pages"), Some(Value::Null), Value::from("/srv/pages"))]
	fn test_coerce(#[case] value: Value, #[case] existing: Option<Value>, #[case] expected: Value) {
		assert_eq!(coerce(value, existing.as_ref()), expected);
	}

	#[rstest]
	fn test_defaults_validate() {
		assert!(Settings::default().validate().is_ok());
	}

	#[rstest]
	#[case::bind(Settings { bind: "nowhere".into(), ..Settings::default() }, "bind")]
	#[case::ttl(Settings { session_ttl_secs: 0, ..Settings::default() }, "session_ttl_secs")]
	#[case::login(Settings { login_url: "login".into(), ..Settings::default() }, "login_url")]
	#[case::pages(Settings { pages_dir: Some("/definitely/not/here".into()), ..Settings::default() }, "pages_dir")]
	fn test_invalid_settings(#[case] settings: Settings, #[case] expected_field: &str) {
		match settings.validate() {
			Err(SettingsError::Invalid { field, .. }) => assert_eq!(field, expected_field),
			other => panic!("expected invalid {expected_field}, got {other:?}"),
		}
	}
}
