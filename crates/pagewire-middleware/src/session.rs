//! Session middleware
//!
//! Binds each request to a server-side session identified by a cookie.
//! A request without a valid session cookie gets a fresh session; the
//! response always carries the (possibly rotated) session cookie, including
//! the error responses produced for failed handlers.

use async_trait::async_trait;
use hyper::header::{HeaderValue, SET_COOKIE};
use pagewire_auth::{SessionConfig, SessionData, SessionHandle, SessionStore};
use pagewire_http::{Handler, Middleware, Request, Response, Result};
use std::sync::Arc;

/// Session middleware
pub struct SessionMiddleware {
	store: Arc<SessionStore>,
	config: SessionConfig,
}

impl SessionMiddleware {
	pub fn new(config: SessionConfig) -> Self {
		Self::with_store(Arc::new(SessionStore::new()), config)
	}

	/// Shares an existing store, e.g. between the middleware and a test.
	pub fn with_store(store: Arc<SessionStore>, config: SessionConfig) -> Self {
		Self { store, config }
	}

	pub fn store(&self) -> &Arc<SessionStore> {
		&self.store
	}

	pub fn config(&self) -> &SessionConfig {
		&self.config
	}

	fn load(&self, request: &Request) -> SessionData {
		request
			.cookie(&self.config.cookie_name)
			.and_then(|id| self.store.get(&id))
			.unwrap_or_else(|| SessionData::new(self.config.ttl))
	}
}

impl Default for SessionMiddleware {
	fn default() -> Self {
		Self::new(SessionConfig::default())
	}
}

#[async_trait]
impl Middleware for SessionMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let handle = SessionHandle::new(self.load(&request));

		// Errors flashed by the previous request are visible to this one only.
		if let Some(errors) = handle.take_flashed_errors()
			&& !errors.is_empty()
		{
			request.extensions.insert(errors);
		}
		request.extensions.insert(handle.clone());

		// A failed request still commits, so the client must learn the session id.
		let mut response = next.handle(request).await.unwrap_or_else(Response::from);

		let cookie = handle.commit(&self.store, &self.config);
		match HeaderValue::from_str(&cookie) {
			Ok(value) => response.append_header(SET_COOKIE, value),
			Err(e) => tracing::warn!(error = %e, "Session cookie is not a valid header value"),
		}
		Ok(response)
	}
}
