//! Error types for route registration and reversal.

use pagewire_http::Method;

/// Errors raised while building the route registry or reversing routes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
	/// A route pattern failed to compile.
	#[error("Invalid route pattern '{pattern}': {message}")]
	InvalidPattern { pattern: String, message: String },

	/// A page route names an invalid page.
	#[error("Invalid page name for route '{pattern}': {message}")]
	InvalidPage { pattern: String, message: String },

	/// Two routes share the same method and pattern.
	#[error("Duplicate route: {method} {pattern}")]
	DuplicateRoute { method: Method, pattern: String },

	/// Two routes share the same name.
	#[error("Duplicate route name: {0}")]
	DuplicateName(String),

	/// No route carries the requested name.
	#[error("No route named '{0}'")]
	UnknownRoute(String),

	/// Reversal is missing a value for a pattern parameter.
	#[error("Route '{route}' requires parameter '{param}'")]
	MissingParameter { route: String, param: String },
}

pub type Result<T> = std::result::Result<T, RegistryError>;
