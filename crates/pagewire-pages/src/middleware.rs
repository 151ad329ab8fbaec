//! Protocol-level middleware for page visits.

use async_trait::async_trait;
use pagewire_http::{Handler, Method, Middleware, Request, Response, Result, StatusCode};
use std::sync::Arc;

use crate::headers::{X_INERTIA_LOCATION, X_INERTIA_VERSION, is_page_visit};

/// Enforces asset versioning and normalizes redirects for page visits.
///
/// - A GET page visit whose `X-Inertia-Version` differs from the current
///   version is answered with `409 Conflict` and `X-Inertia-Location`, which
///   makes the client perform a full reload.
/// - A `302 Found` answering a PUT, PATCH or DELETE page visit becomes
///   `303 See Other` so the follow-up request is a GET.
pub struct PageMiddleware {
	version: String,
}

impl PageMiddleware {
	pub fn new(version: impl Into<String>) -> Self {
		Self {
			version: version.into(),
		}
	}
}

#[async_trait]
impl Middleware for PageMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let client_version = request.header(X_INERTIA_VERSION).unwrap_or_default();
		if request.method == Method::GET && client_version != self.version {
			tracing::info!(
				client_version,
				current = %self.version,
				path = %request.path(),
				"asset version changed, forcing reload"
			);
			return Ok(Response::conflict().with_header(X_INERTIA_LOCATION, request.path_and_query()));
		}

		let rewrites_redirect = matches!(request.method, Method::PUT | Method::PATCH | Method::DELETE);
		let mut response = next.handle(request).await?;
		if rewrites_redirect && response.status == StatusCode::FOUND {
			response.status = StatusCode::SEE_OTHER;
		}
		Ok(response)
	}

	fn should_continue(&self, request: &Request) -> bool {
		is_page_visit(request)
	}
}
