use pagewire_pages::ValidationErrors;

/// Errors raised by the authentication collaborator.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
	/// Submitted input failed validation.
	#[error("Validation failed for {} field(s)", .0.len())]
	Validation(ValidationErrors),

	/// Email and password do not identify a user.
	#[error("Invalid credentials")]
	InvalidCredentials,

	/// A user with this email already exists.
	#[error("Email already registered: {0}")]
	DuplicateEmail(String),

	/// Password hashing or hash parsing failed.
	#[error("Password hashing failed: {0}")]
	Hashing(String),
}

impl From<AuthError> for pagewire_http::Error {
	fn from(err: AuthError) -> Self {
		match err {
			AuthError::InvalidCredentials => pagewire_http::Error::Authentication(err.to_string()),
			AuthError::Validation(_) | AuthError::DuplicateEmail(_) => {
				pagewire_http::Error::BadRequest(err.to_string())
			}
			AuthError::Hashing(_) => pagewire_http::Error::Internal(err.to_string()),
		}
	}
}

pub type Result<T> = std::result::Result<T, AuthError>;
