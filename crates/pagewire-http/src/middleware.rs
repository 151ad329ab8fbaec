//! Middleware and handler traits for HTTP request processing.
//!
//! ## Handler
//!
//! ```rust
//! use pagewire_http::{Handler, Request, Response, Result};
//! use async_trait::async_trait;
//!
//! struct MyHandler;
//!
//! #[async_trait]
//! impl Handler for MyHandler {
//!     async fn handle(&self, _request: Request) -> Result<Response> {
//!         Ok(Response::ok().with_body("Hello!"))
//!     }
//! }
//! ```
//!
//! ## Middleware
//!
//! ```rust
//! use pagewire_http::{Handler, Middleware, Request, Response, Result};
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! struct Tagging;
//!
//! #[async_trait]
//! impl Middleware for Tagging {
//!     async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
//!         let response = next.handle(request).await?;
//!         Ok(response.with_header("X-Tagged", "yes"))
//!     }
//! }
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::{Request, Response, Result};

/// Handler trait for processing requests.
///
/// Handlers receive a request and produce a response or an error.
#[async_trait]
pub trait Handler: Send + Sync {
	/// Handles an HTTP request and produces a response.
	///
	/// # Errors
	///
	/// Returns an error if the request cannot be processed.
	async fn handle(&self, request: Request) -> Result<Response>;
}

#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
	async fn handle(&self, request: Request) -> Result<Response> {
		(**self).handle(request).await
	}
}

/// Middleware trait for request/response processing.
///
/// Middleware can modify requests before passing to the next handler,
/// or modify responses after the handler processes the request. Returning
/// without calling `next` short-circuits the rest of the chain.
#[async_trait]
pub trait Middleware: Send + Sync {
	/// Processes a request through this middleware.
	///
	/// # Errors
	///
	/// Returns an error if the middleware or next handler fails.
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response>;

	/// Determines whether this middleware should run for the given request.
	///
	/// Skipped middleware is left out of the composed chain entirely.
	fn should_continue(&self, _request: &Request) -> bool {
		true
	}
}

/// Middleware chain - composes multiple middleware into a single handler.
///
/// Middleware runs in the order it was added: the first one added sees the
/// request first and the response last.
pub struct MiddlewareChain {
	middlewares: Vec<Arc<dyn Middleware>>,
	handler: Arc<dyn Handler>,
}

impl MiddlewareChain {
	/// Creates a new middleware chain around the given handler.
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			middlewares: Vec::new(),
			handler,
		}
	}

	/// Adds a middleware to the chain using builder pattern.
	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middlewares.push(middleware);
		self
	}

	/// Adds a middleware to the chain.
	pub fn add_middleware(&mut self, middleware: Arc<dyn Middleware>) {
		self.middlewares.push(middleware);
	}

	/// Number of middleware in the chain
	pub fn len(&self) -> usize {
		self.middlewares.len()
	}

	pub fn is_empty(&self) -> bool {
		self.middlewares.is_empty()
	}
}

#[async_trait]
impl Handler for MiddlewareChain {
	async fn handle(&self, request: Request) -> Result<Response> {
		if self.middlewares.is_empty() {
			return self.handler.handle(request).await;
		}

		// Wrap from the innermost outward so the first middleware added runs first.
		let mut current: Arc<dyn Handler> = self.handler.clone();
		for middleware in self
			.middlewares
			.iter()
			.rev()
			.filter(|mw| mw.should_continue(&request))
		{
			current = Arc::new(Next {
				middleware: middleware.clone(),
				next: current,
			});
		}

		current.handle(request).await
	}
}

/// A middleware bound to the handler it delegates to.
struct Next {
	middleware: Arc<dyn Middleware>,
	next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for Next {
	async fn handle(&self, request: Request) -> Result<Response> {
		self.middleware.process(request, self.next.clone()).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::sync::Mutex;

	struct EchoHandler;

	#[async_trait]
	impl Handler for EchoHandler {
		async fn handle(&self, _request: Request) -> Result<Response> {
			Ok(Response::ok().with_body("handler"))
		}
	}

	struct RecordingMiddleware {
		name: &'static str,
		log: Arc<Mutex<Vec<String>>>,
		only_path: Option<&'static str>,
	}

	#[async_trait]
	impl Middleware for RecordingMiddleware {
		async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
			self.log.lock().unwrap().push(format!("{}:before", self.name));
			let response = next.handle(request).await?;
			self.log.lock().unwrap().push(format!("{}:after", self.name));
			Ok(response)
		}

		fn should_continue(&self, request: &Request) -> bool {
			self.only_path.is_none_or(|p| request.path() == p)
		}
	}

	struct ShortCircuit;

	#[async_trait]
	impl Middleware for ShortCircuit {
		async fn process(&self, _request: Request, _next: Arc<dyn Handler>) -> Result<Response> {
			Ok(Response::temporary_redirect("/login"))
		}
	}

	fn recording(
		name: &'static str,
		log: &Arc<Mutex<Vec<String>>>,
		only_path: Option<&'static str>,
	) -> Arc<dyn Middleware> {
		Arc::new(RecordingMiddleware {
			name,
			log: log.clone(),
			only_path,
		})
	}

	#[rstest]
	#[tokio::test]
	async fn test_middleware_runs_in_insertion_order() {
		// Arrange
		let log = Arc::new(Mutex::new(Vec::new()));
		let chain = MiddlewareChain::new(Arc::new(EchoHandler))
			.with_middleware(recording("outer", &log, None))
			.with_middleware(recording("inner", &log, None));

		// Act
		let response = chain
			.handle(Request::builder().build().unwrap())
			.await
			.unwrap();

		// Assert
		assert_eq!(response.body, "handler");
		assert_eq!(
			*log.lock().unwrap(),
			vec!["outer:before", "inner:before", "inner:after", "outer:after"]
		);
	}

	#[rstest]
	#[tokio::test]
	async fn test_should_continue_skips_middleware() {
		let log = Arc::new(Mutex::new(Vec::new()));
		let chain = MiddlewareChain::new(Arc::new(EchoHandler))
			.with_middleware(recording("scoped", &log, Some("/admin")));

		chain
			.handle(Request::builder().uri("/").build().unwrap())
			.await
			.unwrap();

		assert!(log.lock().unwrap().is_empty());
	}

	#[rstest]
	#[tokio::test]
	async fn test_middleware_can_short_circuit() {
		let log = Arc::new(Mutex::new(Vec::new()));
		let chain = MiddlewareChain::new(Arc::new(EchoHandler))
			.with_middleware(Arc::new(ShortCircuit))
			.with_middleware(recording("never", &log, None));

		let response = chain
			.handle(Request::builder().build().unwrap())
			.await
			.unwrap();

		assert_eq!(response.location(), Some("/login"));
		assert!(log.lock().unwrap().is_empty());
	}
}
