//! HTTP request representation with a fully buffered body.

use crate::{Error, Extensions, Result};
use bytes::Bytes;
use hyper::header::{CONTENT_TYPE, COOKIE};
use hyper::{HeaderMap, Method, Uri, Version};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::net::SocketAddr;

/// HTTP Request representation
#[derive(Debug)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	/// Parameters captured by the matched route pattern.
	pub path_params: HashMap<String, String>,
	pub query_params: HashMap<String, String>,
	/// Values attached by middleware (session handle, auth state).
	pub extensions: Extensions,
	pub remote_addr: Option<SocketAddr>,
}

/// Builder for [`Request`]
#[derive(Debug, Default)]
pub struct RequestBuilder {
	method: Option<Method>,
	uri: Option<String>,
	version: Option<Version>,
	headers: HeaderMap,
	body: Bytes,
	remote_addr: Option<SocketAddr>,
}

impl RequestBuilder {
	/// Set the request method (defaults to GET)
	pub fn method(mut self, method: Method) -> Self {
		self.method = Some(method);
		self
	}

	/// Set the request URI (defaults to `/`)
	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = Some(uri.into());
		self
	}

	pub fn version(mut self, version: Version) -> Self {
		self.version = Some(version);
		self
	}

	/// Replace all headers
	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	/// Add a single header; invalid names or values are ignored
	pub fn header(mut self, name: &str, value: &str) -> Self {
		if let (Ok(name), Ok(value)) = (
			hyper::header::HeaderName::from_bytes(name.as_bytes()),
			hyper::header::HeaderValue::from_str(value),
		) {
			self.headers.append(name, value);
		}
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	pub fn remote_addr(mut self, addr: SocketAddr) -> Self {
		self.remote_addr = Some(addr);
		self
	}

	/// Build the request
	///
	/// # Errors
	///
	/// Returns [`Error::BadRequest`] when the URI cannot be parsed.
	pub fn build(self) -> Result<Request> {
		let uri = self
			.uri
			.as_deref()
			.unwrap_or("/")
			.parse::<Uri>()
			.map_err(|e| Error::BadRequest(e.to_string()))?;
		let query_params = Request::parse_query_params(&uri);

		Ok(Request {
			method: self.method.unwrap_or(Method::GET),
			uri,
			version: self.version.unwrap_or(Version::HTTP_11),
			headers: self.headers,
			body: self.body,
			path_params: HashMap::new(),
			query_params,
			extensions: Extensions::new(),
			remote_addr: self.remote_addr,
		})
	}
}

impl Request {
	/// Start building a request
	///
	/// # Examples
	///
	/// ```
	/// use pagewire_http::{Method, Request};
	///
	/// let request = Request::builder()
	///     .method(Method::POST)
	///     .uri("/login?next=%2Fdashboard")
	///     .header("X-Inertia", "true")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.path(), "/login");
	/// assert_eq!(request.header("x-inertia"), Some("true"));
	/// assert_eq!(request.query_params.get("next").map(String::as_str), Some("/dashboard"));
	/// ```
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	/// Construct a request directly from parts, as the server does.
	pub fn new(
		method: Method,
		uri: Uri,
		version: Version,
		headers: HeaderMap,
		body: Bytes,
	) -> Self {
		let query_params = Self::parse_query_params(&uri);
		Self {
			method,
			uri,
			version,
			headers,
			body,
			path_params: HashMap::new(),
			query_params,
			extensions: Extensions::new(),
			remote_addr: None,
		}
	}

	fn parse_query_params(uri: &Uri) -> HashMap<String, String> {
		uri.query()
			.and_then(|q| serde_urlencoded::from_str::<Vec<(String, String)>>(q).ok())
			.map(|pairs| pairs.into_iter().collect())
			.unwrap_or_default()
	}

	/// Get the request path
	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Path plus query string, as the client requested it.
	pub fn path_and_query(&self) -> &str {
		self.uri
			.path_and_query()
			.map(|pq| pq.as_str())
			.unwrap_or_else(|| self.uri.path())
	}

	/// Get a header value as a string, ignoring non-ASCII values
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|v| v.to_str().ok())
	}

	/// Set a path parameter (used by the router for `{name}` captures)
	pub fn set_path_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.path_params.insert(key.into(), value.into());
	}

	/// Look up a cookie by name
	///
	/// Malformed pairs (missing `=`, empty name) are skipped.
	///
	/// # Examples
	///
	/// ```
	/// use pagewire_http::Request;
	///
	/// let request = Request::builder()
	///     .header("cookie", "theme=dark; pagewire_session=abc123")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.cookie("pagewire_session"), Some("abc123".to_string()));
	/// assert_eq!(request.cookie("missing"), None);
	/// ```
	pub fn cookie(&self, name: &str) -> Option<String> {
		self.headers
			.get_all(COOKIE)
			.iter()
			.filter_map(|h| h.to_str().ok())
			.flat_map(|h| h.split(';'))
			.find_map(|pair| {
				let (key, value) = pair.trim().split_once('=')?;
				let key = key.trim();
				(!key.is_empty() && key == name).then(|| value.trim().to_string())
			})
	}

	/// Whether the body was sent as JSON
	pub fn is_json(&self) -> bool {
		self.header(CONTENT_TYPE.as_str())
			.is_some_and(|ct| ct.starts_with("application/json"))
	}

	/// Deserialize the body as a submitted form
	///
	/// JSON bodies are accepted alongside `application/x-www-form-urlencoded`,
	/// since page visits from the client post JSON.
	///
	/// # Errors
	///
	/// Returns [`Error::BadRequest`] if the body does not match `T`.
	pub fn parse_form<T: DeserializeOwned>(&self) -> Result<T> {
		if self.is_json() {
			serde_json::from_slice(&self.body).map_err(|e| Error::BadRequest(e.to_string()))
		} else {
			serde_urlencoded::from_bytes(&self.body).map_err(|e| Error::BadRequest(e.to_string()))
		}
	}
}
