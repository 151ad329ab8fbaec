//! Turns registry resolutions into responses.

use async_trait::async_trait;
use pagewire_http::{AuthState, Error, Handler, Request, Response, Result};
use pagewire_pages::PageResponder;
use pagewire_urls::{Resolution, RouteRegistry};
use std::sync::Arc;
use tracing::debug;

/// Innermost handler of the application: resolves the request against the
/// route table and renders the page, runs the handler or redirects.
///
/// Reads the caller's [`AuthState`] from the request extensions; a request
/// that bypassed the authentication middleware is anonymous.
pub struct RouterHandler {
	registry: Arc<RouteRegistry>,
	responder: PageResponder,
}

impl RouterHandler {
	pub fn new(registry: Arc<RouteRegistry>, responder: PageResponder) -> Self {
		Self {
			registry,
			responder,
		}
	}
}

#[async_trait]
impl Handler for RouterHandler {
	async fn handle(&self, mut request: Request) -> Result<Response> {
		let caller = AuthState::from_extensions(&request.extensions);

		match self.registry.resolve(&request.method, request.path(), &caller) {
			Resolution::Page {
				page,
				props,
				params,
			} => {
				debug!(path = %request.path(), %page, "Rendering page");
				for (key, value) in params {
					request.set_path_param(key, value);
				}
				self.responder.render(&request, page, props)
			}
			Resolution::Handler { handler, params } => {
				debug!(method = %request.method, path = %request.path(), "Dispatching to handler");
				for (key, value) in params {
					request.set_path_param(key, value);
				}
				handler.handle(request).await
			}
			Resolution::Redirect { location, gate } => {
				debug!(path = %request.path(), %gate, %location, "Gate redirect");
				Ok(Response::temporary_redirect(location))
			}
			Resolution::NotFound => Err(Error::NotFound(format!(
				"{} {}",
				request.method,
				request.path()
			))),
		}
	}
}
