//! Logical page identifiers.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;

use crate::{PageError, Result};

/// Directory that holds page components, relative to the client source root.
pub const PAGES_DIR: &str = "Pages";

/// A normalized, slash-delimited page identifier such as `Auth/Login`.
///
/// Normalization turns backslashes into slashes and strips surrounding
/// slashes, so `\\Auth\\Login` and `/Auth/Login/` both name `Auth/Login`.
/// Names are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageName(String);

impl PageName {
	/// Creates a page name, normalizing separators.
	///
	/// # Errors
	///
	/// Returns [`PageError::InvalidName`] for empty names or names containing
	/// empty, `.` or `..` segments.
	///
	/// # Examples
	///
	/// ```
	/// use pagewire_pages::PageName;
	///
	/// let name = PageName::new("/Auth\\Login/").unwrap();
	/// assert_eq!(name.as_str(), "Auth/Login");
	///
	/// assert!(PageName::new("").is_err());
	/// assert!(PageName::new("Auth/../Secret").is_err());
	/// ```
	pub fn new(name: impl AsRef<str>) -> Result<Self> {
		let raw = name.as_ref();
		let normalized = raw.trim().replace('\\', "/");
		let normalized = normalized.trim_matches('/');

		if normalized.is_empty() {
			return Err(PageError::InvalidName {
				name: raw.to_string(),
				reason: "name is empty",
			});
		}
		if normalized
			.split('/')
			.any(|segment| segment.is_empty() || segment == "." || segment == "..")
		{
			return Err(PageError::InvalidName {
				name: raw.to_string(),
				reason: "name contains an empty or relative segment",
			});
		}

		Ok(Self(normalized.to_string()))
	}

	/// Derives a page name from a component module path.
	///
	/// Accepts both paths relative to the page directory (`Auth/Login.vue`) and
	/// client-style module keys (`./Pages/Auth/Login.vue`). The file extension
	/// is dropped.
	///
	/// # Examples
	///
	/// ```
	/// use pagewire_pages::PageName;
	///
	/// let name = PageName::from_module_path("./Pages/Auth/Register.vue").unwrap();
	/// assert_eq!(name.as_str(), "Auth/Register");
	/// ```
	pub fn from_module_path(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let without_ext = path.with_extension("");
		let text = without_ext.to_string_lossy().replace('\\', "/");
		let text = text.trim_start_matches("./");
		let text = text
			.strip_prefix(PAGES_DIR)
			.and_then(|rest| rest.strip_prefix('/'))
			.unwrap_or(text);
		Self::new(text)
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// The module key a bundler would use for this page.
	pub fn module_key(&self, extension: &str) -> String {
		format!("./{}/{}.{}", PAGES_DIR, self.0, extension)
	}
}

impl fmt::Display for PageName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for PageName {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl TryFrom<&str> for PageName {
	type Error = PageError;

	fn try_from(value: &str) -> Result<Self> {
		Self::new(value)
	}
}

impl Serialize for PageName {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.0)
	}
}

impl<'de> Deserialize<'de> for PageName {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
		let raw = String::deserialize(deserializer)?;
		Self::new(raw).map_err(serde::de::Error::custom)
	}
}
