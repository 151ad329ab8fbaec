//! Access gates applied to route groups.

use pagewire_http::AuthState;
use std::fmt;

/// A predicate a caller must satisfy to reach a route.
///
/// A failing gate redirects instead of matching: anonymous callers go to the
/// login page, authenticated callers go to the home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gate {
	/// Only anonymous callers may pass.
	Guest,
	/// Only authenticated callers may pass.
	Authenticated,
}

impl Gate {
	/// Returns the redirect target if `caller` fails this gate.
	///
	/// # Examples
	///
	/// ```
	/// use pagewire_http::AuthState;
	/// use pagewire_urls::{Gate, GateRedirects};
	///
	/// let redirects = GateRedirects::default();
	///
	/// assert_eq!(Gate::Authenticated.check(&AuthState::anonymous(), &redirects), Some("/login"));
	/// assert_eq!(Gate::Guest.check(&AuthState::authenticated("1"), &redirects), Some("/dashboard"));
	/// assert_eq!(Gate::Guest.check(&AuthState::anonymous(), &redirects), None);
	/// ```
	pub fn check<'a>(&self, caller: &AuthState, redirects: &'a GateRedirects) -> Option<&'a str> {
		match self {
			Gate::Guest if caller.is_authenticated => Some(&redirects.home_url),
			Gate::Authenticated if !caller.is_authenticated => Some(&redirects.login_url),
			_ => None,
		}
	}
}

impl fmt::Display for Gate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Gate::Guest => f.write_str("guest"),
			Gate::Authenticated => f.write_str("auth"),
		}
	}
}

/// Where callers rejected by a gate are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateRedirects {
	/// Target for anonymous callers hitting an authenticated route.
	pub login_url: String,
	/// Target for authenticated callers hitting a guest route.
	pub home_url: String,
}

impl Default for GateRedirects {
	fn default() -> Self {
		Self {
			login_url: "/login".to_string(),
			home_url: "/dashboard".to_string(),
		}
	}
}
