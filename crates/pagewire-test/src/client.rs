//! In-process test client with a cookie jar.

use bytes::Bytes;
use hyper::Method;
use pagewire_http::{Handler, Request, Response};
use pagewire_pages::headers::{X_INERTIA, X_INERTIA_VERSION};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::TestResponse;

/// Drives a handler the way a browser would: cookies set by one response
/// are sent with the next request.
///
/// Handler errors are turned into responses exactly as the server does, so
/// tests observe the same status codes a real client would.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use pagewire_http::{Handler, Request, Response, Result};
/// use pagewire_test::TestClient;
/// use std::sync::Arc;
///
/// struct Hello;
///
/// #[async_trait]
/// impl Handler for Hello {
///     async fn handle(&self, _request: Request) -> Result<Response> {
///         Ok(Response::ok().with_body("hello"))
///     }
/// }
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let client = TestClient::new(Arc::new(Hello));
/// assert_eq!(client.get("/").await.text(), "hello");
/// # });
/// ```
pub struct TestClient {
	handler: Arc<dyn Handler>,
	cookies: Mutex<BTreeMap<String, String>>,
	page_version: Option<String>,
}

impl TestClient {
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			handler,
			cookies: Mutex::new(BTreeMap::new()),
			page_version: None,
		}
	}

	/// Asset version sent with page visits.
	pub fn with_page_version(mut self, version: impl Into<String>) -> Self {
		self.page_version = Some(version.into());
		self
	}

	/// A first-load browser GET, answered with an HTML document.
	pub async fn get(&self, path: &str) -> TestResponse {
		self.request(Method::GET, path, &[], Bytes::new()).await
	}

	/// A client-side page visit, answered with a JSON page object.
	pub async fn visit(&self, path: &str) -> TestResponse {
		let headers = self.visit_headers();
		self.request(Method::GET, path, &headers, Bytes::new()).await
	}

	/// A page visit with extra headers, e.g. partial reload selectors.
	pub async fn visit_with_headers(&self, path: &str, extra: &[(&str, &str)]) -> TestResponse {
		let mut headers = self.visit_headers();
		headers.extend_from_slice(extra);
		self.request(Method::GET, path, &headers, Bytes::new()).await
	}

	/// A classic form submission.
	pub async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
		let body = serde_urlencoded::to_string(fields).unwrap_or_default();
		self.request(
			Method::POST,
			path,
			&[("content-type", "application/x-www-form-urlencoded")],
			Bytes::from(body),
		)
		.await
	}

	/// A page-visit submission with a JSON body.
	pub async fn visit_with_json<T: Serialize>(&self, method: Method, path: &str, data: &T) -> TestResponse {
		let body = serde_json::to_vec(data).unwrap_or_default();
		let mut headers = self.visit_headers();
		headers.push(("content-type", "application/json"));
		self.request(method, path, &headers, Bytes::from(body)).await
	}

	/// Follows a redirect with a plain GET.
	///
	/// Returns `None` when `response` is not a redirect.
	pub async fn follow(&self, response: &TestResponse) -> Option<TestResponse> {
		let location = response.location()?.to_string();
		if !response.is_redirect() {
			return None;
		}
		Some(self.get(&location).await)
	}

	/// Sends an arbitrary request through the handler.
	pub async fn request(
		&self,
		method: Method,
		path: &str,
		headers: &[(&str, &str)],
		body: Bytes,
	) -> TestResponse {
		let mut builder = Request::builder().method(method).uri(path).body(body);
		for (name, value) in headers {
			builder = builder.header(name, value);
		}
		if let Some(cookie) = self.cookie_header() {
			builder = builder.header("cookie", &cookie);
		}

		let response = match builder.build() {
			Ok(request) => self
				.handler
				.handle(request)
				.await
				.unwrap_or_else(Response::from),
			Err(err) => Response::from(err),
		};

		let response = TestResponse::new(response);
		self.store_cookies(&response);
		response
	}

	pub fn cookie(&self, name: &str) -> Option<String> {
		self.cookies.lock().get(name).cloned()
	}

	pub fn clear_cookies(&self) {
		self.cookies.lock().clear();
	}

	fn visit_headers(&self) -> Vec<(&str, &str)> {
		let mut headers = vec![(X_INERTIA, "true")];
		if let Some(version) = &self.page_version {
			headers.push((X_INERTIA_VERSION, version.as_str()));
		}
		headers
	}

	fn cookie_header(&self) -> Option<String> {
		let cookies = self.cookies.lock();
		(!cookies.is_empty()).then(|| {
			cookies
				.iter()
				.map(|(name, value)| format!("{name}={value}"))
				.collect::<Vec<_>>()
				.join("; ")
		})
	}

	fn store_cookies(&self, response: &TestResponse) {
		let mut cookies = self.cookies.lock();
		for set_cookie in response.set_cookies() {
			let mut parts = set_cookie.split(';').map(str::trim);
			let Some((name, value)) = parts.next().and_then(|pair| pair.split_once('=')) else {
				continue;
			};
			let expired = parts.any(|attr| attr.eq_ignore_ascii_case("max-age=0"));
			if expired || value.is_empty() {
				cookies.remove(name);
			} else {
				cookies.insert(name.to_string(), value.to_string());
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use rstest::rstest;

	/// Sets a cookie on `/set`, clears it on `/clear`, echoes the cookie header.
	struct CookieHandler;

	#[async_trait]
	impl Handler for CookieHandler {
		async fn handle(&self, request: Request) -> pagewire_http::Result<Response> {
			let echoed = request.header("cookie").unwrap_or("").to_string();
			let response = Response::ok().with_body(echoed);
			Ok(match request.path() {
				"/set" => response.with_header("set-cookie", "sid=abc; Path=/; HttpOnly"),
				"/clear" => response.with_header("set-cookie", "sid=; Path=/; Max-Age=0"),
				"/missing" => return Err(pagewire_http::Error::NotFound("/missing".into())),
				_ => response,
			})
		}
	}

	#[rstest]
	#[tokio::test]
	async fn test_cookie_jar_round_trip() {
		let client = TestClient::new(Arc::new(CookieHandler));

		client.get("/set").await;
		let echoed = client.get("/").await.text();
		client.get("/clear").await;

		assert_eq!(echoed, "sid=abc");
		assert_eq!(client.cookie("sid"), None);
	}

	#[rstest]
	#[tokio::test]
	async fn test_handler_errors_become_responses() {
		let client = TestClient::new(Arc::new(CookieHandler));

		let response = client.get("/missing").await;

		assert_eq!(response.status_code(), 404);
	}
}
