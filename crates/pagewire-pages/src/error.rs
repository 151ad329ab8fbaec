//! Error types for page naming, discovery and resolution.

use std::path::PathBuf;

use crate::PageName;

/// Errors raised while building the component registry or resolving pages.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
	/// The page name is empty or contains an invalid segment.
	#[error("Invalid page name '{name}': {reason}")]
	InvalidName { name: String, reason: &'static str },

	/// No component is registered under the requested name.
	#[error("Page not found: {0}")]
	NotFound(PageName),

	/// Routes reference pages that have no component.
	#[error("Pages referenced by routes have no component: {}", join(.0))]
	Incomplete(Vec<PageName>),

	/// Two components normalize to the same page name.
	#[error("Duplicate page '{name}' ({first} and {second})")]
	Duplicate {
		name: PageName,
		first: PathBuf,
		second: PathBuf,
	},

	/// The page directory could not be walked.
	#[error("Failed to discover pages under {root}: {message}")]
	Discovery { root: PathBuf, message: String },

	/// The page object could not be encoded or decoded.
	#[error("Page serialization failed: {0}")]
	Serialization(#[from] serde_json::Error),
}

fn join(names: &[PageName]) -> String {
	names
		.iter()
		.map(PageName::as_str)
		.collect::<Vec<_>>()
		.join(", ")
}

impl From<PageError> for pagewire_http::Error {
	fn from(err: PageError) -> Self {
		match err {
			PageError::NotFound(_) | PageError::Incomplete(_) => {
				pagewire_http::Error::ImproperlyConfigured(err.to_string())
			}
			PageError::Serialization(e) => pagewire_http::Error::Serialization(e.to_string()),
			other => pagewire_http::Error::Internal(other.to_string()),
		}
	}
}

pub type Result<T> = std::result::Result<T, PageError>;
