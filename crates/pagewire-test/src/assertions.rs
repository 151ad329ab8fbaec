//! Assertion helpers for page responses.

use hyper::StatusCode;
use pagewire_pages::PageObject;

use crate::TestResponse;

/// Assert a response status
///
/// # Panics
///
/// Panics if the status differs.
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
	assert_eq!(
		response.status(),
		expected,
		"Expected status {}, got {}. Body: {}",
		expected,
		response.status(),
		response.text()
	);
}

/// Assert a redirect to `location`
///
/// # Panics
///
/// Panics if the response is not a redirect or points elsewhere.
pub fn assert_redirect(response: &TestResponse, location: &str) {
	assert!(
		response.is_redirect(),
		"Expected a redirect to {}, got status {}",
		location,
		response.status()
	);
	assert_eq!(response.location(), Some(location), "Unexpected redirect target");
}

/// Assert the response renders `component` and return its page object
///
/// # Panics
///
/// Panics if the response carries no page object or a different component.
pub fn assert_page(response: &TestResponse, component: &str) -> PageObject {
	let Some(page) = response.page() else {
		panic!(
			"Expected page {}, got status {} with body: {}",
			component,
			response.status(),
			response.text()
		);
	};
	assert_eq!(page.component.as_str(), component, "Unexpected component");
	page
}
