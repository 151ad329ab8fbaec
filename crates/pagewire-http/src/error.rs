//! Error type shared by handlers and middleware.

/// Errors produced while handling a request.
///
/// Every variant maps to an HTTP status code through [`Error::status_code`],
/// which is what the server uses when a handler returns `Err`.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// No route or resource matched the request.
	#[error("Not found: {0}")]
	NotFound(String),

	/// The request was malformed (unparseable body, bad header value).
	#[error("Bad request: {0}")]
	BadRequest(String),

	/// The caller could not be authenticated.
	#[error("Authentication failed: {0}")]
	Authentication(String),

	/// A value could not be serialized or deserialized.
	#[error("Serialization error: {0}")]
	Serialization(String),

	/// The application was assembled with an inconsistent configuration.
	#[error("Improperly configured: {0}")]
	ImproperlyConfigured(String),

	/// Any other failure.
	#[error("Internal server error: {0}")]
	Internal(String),
}

impl Error {
	/// Returns the HTTP status code associated with this error.
	///
	/// # Examples
	///
	/// ```
	/// use pagewire_http::Error;
	///
	/// assert_eq!(Error::NotFound("/missing".into()).status_code(), 404);
	/// assert_eq!(Error::BadRequest("bad form".into()).status_code(), 400);
	/// assert_eq!(Error::Internal("boom".into()).status_code(), 500);
	/// ```
	pub fn status_code(&self) -> u16 {
		match self {
			Error::NotFound(_) => 404,
			Error::BadRequest(_) => 400,
			Error::Authentication(_) => 401,
			Error::Serialization(_) => 500,
			Error::ImproperlyConfigured(_) => 500,
			Error::Internal(_) => 500,
		}
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Error::Serialization(err.to_string())
	}
}

/// Result alias used across the request pipeline.
pub type Result<T> = std::result::Result<T, Error>;
