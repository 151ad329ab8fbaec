//! Header names of the page protocol.

/// Marks a request as a page visit, and the response as a page object.
pub const X_INERTIA: &str = "x-inertia";

/// Asset version the client was built against.
pub const X_INERTIA_VERSION: &str = "x-inertia-version";

/// URL the client must hard-reload after a version conflict.
pub const X_INERTIA_LOCATION: &str = "x-inertia-location";

/// Component a partial reload targets.
pub const X_INERTIA_PARTIAL_COMPONENT: &str = "x-inertia-partial-component";

/// Comma-separated props to keep on a partial reload.
pub const X_INERTIA_PARTIAL_DATA: &str = "x-inertia-partial-data";

/// Comma-separated props to drop on a partial reload.
pub const X_INERTIA_PARTIAL_EXCEPT: &str = "x-inertia-partial-except";

/// Whether the request is a page visit from the client bootstrap.
pub fn is_page_visit(request: &pagewire_http::Request) -> bool {
	request
		.header(X_INERTIA)
		.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}
