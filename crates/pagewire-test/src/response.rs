//! Test response wrapper with assertion helpers

use bytes::Bytes;
use hyper::header::LOCATION;
use hyper::{HeaderMap, StatusCode};
use pagewire_http::Response;
use pagewire_pages::PageObject;
use pagewire_pages::headers::X_INERTIA;
use pagewire_pages::shell::extract_page_json;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Test response wrapper
#[derive(Debug, Clone)]
pub struct TestResponse {
	status: StatusCode,
	headers: HeaderMap,
	body: Bytes,
}

impl TestResponse {
	pub fn new(response: Response) -> Self {
		Self {
			status: response.status,
			headers: response.headers,
			body: response.body,
		}
	}

	pub fn status(&self) -> StatusCode {
		self.status
	}

	pub fn status_code(&self) -> u16 {
		self.status.as_u16()
	}

	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|v| v.to_str().ok())
	}

	/// Every `Set-Cookie` value, in order.
	pub fn set_cookies(&self) -> Vec<&str> {
		self.headers
			.get_all(hyper::header::SET_COOKIE)
			.iter()
			.filter_map(|v| v.to_str().ok())
			.collect()
	}

	pub fn body(&self) -> &Bytes {
		&self.body
	}

	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).to_string()
	}

	pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
		serde_json::from_slice(&self.body)
	}

	pub fn json_value(&self) -> Result<Value, serde_json::Error> {
		self.json()
	}

	pub fn location(&self) -> Option<&str> {
		self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
	}

	pub fn is_redirect(&self) -> bool {
		self.status.is_redirection()
	}

	/// Whether the body is a JSON page object rather than a document.
	pub fn is_page_visit(&self) -> bool {
		self.header(X_INERTIA) == Some("true")
	}

	/// Decodes the page object from a JSON page visit or an HTML document.
	///
	/// Returns `None` for responses that carry no page.
	pub fn page(&self) -> Option<PageObject> {
		if self.is_page_visit() {
			return self.json().ok();
		}
		let json = extract_page_json(&self.text())?;
		PageObject::from_json(&json).ok()
	}
}

impl From<Response> for TestResponse {
	fn from(response: Response) -> Self {
		Self::new(response)
	}
}
