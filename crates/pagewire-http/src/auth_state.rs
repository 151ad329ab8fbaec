//! Authentication state stored in request extensions.

use crate::Extensions;

/// Caller identity published by authentication middleware.
///
/// Route gates and handlers read this from [`Request::extensions`]; a request
/// that carries no `AuthState` is treated as anonymous.
///
/// [`Request::extensions`]: crate::Request::extensions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
	/// The authenticated user's ID, empty for anonymous callers.
	pub user_id: String,

	/// Whether the user is authenticated.
	pub is_authenticated: bool,
}

impl AuthState {
	/// Creates a new authenticated state.
	///
	/// # Examples
	///
	/// ```
	/// use pagewire_http::AuthState;
	///
	/// let state = AuthState::authenticated("42");
	/// assert!(state.is_authenticated);
	/// assert_eq!(state.user_id, "42");
	/// ```
	pub fn authenticated(user_id: impl Into<String>) -> Self {
		Self {
			user_id: user_id.into(),
			is_authenticated: true,
		}
	}

	/// Creates an anonymous (unauthenticated) state.
	pub fn anonymous() -> Self {
		Self {
			user_id: String::new(),
			is_authenticated: false,
		}
	}

	/// Reads the auth state from request extensions, defaulting to anonymous.
	pub fn from_extensions(extensions: &Extensions) -> Self {
		extensions.get::<AuthState>().unwrap_or_else(Self::anonymous)
	}

	/// Check if user is anonymous (not authenticated).
	pub fn is_anonymous(&self) -> bool {
		!self.is_authenticated
	}
}

impl Default for AuthState {
	fn default() -> Self {
		Self::anonymous()
	}
}
