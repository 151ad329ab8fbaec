use async_trait::async_trait;
use chrono::Utc;
use pagewire_http::{Handler, Middleware, Request, Response, Result};
use std::sync::Arc;

/// Logging middleware
/// Logs request/response information
pub struct LoggingMiddleware;

impl LoggingMiddleware {
	/// Create a new logging middleware
	///
	/// This middleware logs each request with its method, path, status code, and duration.
	///
	/// # Examples
	///
	/// ```
	/// use std::sync::Arc;
	/// use pagewire_middleware::LoggingMiddleware;
	/// use pagewire_http::{Handler, Middleware, Request, Response, StatusCode};
	///
	/// struct TestHandler;
	///
	/// #[async_trait::async_trait]
	/// impl Handler for TestHandler {
	///     async fn handle(&self, _request: Request) -> pagewire_http::Result<Response> {
	///         Ok(Response::ok().with_body("OK"))
	///     }
	/// }
	///
	/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
	/// let middleware = LoggingMiddleware::new();
	/// let request = Request::builder().uri("/about").build().unwrap();
	///
	/// let response = middleware.process(request, Arc::new(TestHandler)).await.unwrap();
	/// assert_eq!(response.status, StatusCode::OK);
	/// # });
	/// ```
	pub fn new() -> Self {
		Self
	}
}

impl Default for LoggingMiddleware {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Middleware for LoggingMiddleware {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let start = Utc::now();
		let method = request.method.to_string();
		let path = request.path().to_string();

		let result = next.handle(request).await;

		let elapsed_ms = Utc::now().signed_duration_since(start).num_milliseconds();

		match &result {
			Ok(response) => {
				tracing::info!(
					%method,
					%path,
					status = response.status.as_u16(),
					elapsed_ms,
					"Request completed"
				);
			}
			Err(err) => {
				tracing::warn!(
					%method,
					%path,
					status = err.status_code(),
					error = %err,
					elapsed_ms,
					"Request failed"
				);
			}
		}

		result
	}
}
