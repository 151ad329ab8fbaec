//! # Pagewire Middleware
//!
//! Request pipeline stages run around the route dispatcher:
//!
//! - [`LoggingMiddleware`]: one structured log line per request
//! - [`SessionMiddleware`]: loads the cookie-bound session and exposes flashed errors
//! - [`AuthenticationMiddleware`]: turns the session's user into an [`AuthState`](pagewire_http::AuthState)
//!
//! Session must run before authentication, which reads the session handle.

pub mod auth;
pub mod logging;
pub mod session;

pub use auth::AuthenticationMiddleware;
pub use logging::LoggingMiddleware;
pub use session::SessionMiddleware;
