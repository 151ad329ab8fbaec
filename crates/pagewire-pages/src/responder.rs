//! Turns a page name and its props into an HTTP response.

use pagewire_http::{Request, Response, Result};

use crate::headers::{
	X_INERTIA, X_INERTIA_PARTIAL_COMPONENT, X_INERTIA_PARTIAL_DATA, X_INERTIA_PARTIAL_EXCEPT,
	is_page_visit,
};
use crate::props::ERRORS_KEY;
use crate::{HtmlShell, PageName, PageObject, Props, ValidationErrors};

/// Renders pages for both first loads and client page visits.
///
/// Page visits receive the page object as JSON; every other request receives
/// the HTML root document produced by the [`HtmlShell`].
#[derive(Debug, Clone)]
pub struct PageResponder {
	version: String,
	shell: HtmlShell,
}

impl PageResponder {
	pub fn new(version: impl Into<String>, shell: HtmlShell) -> Self {
		Self {
			version: version.into(),
			shell,
		}
	}

	/// Current asset version.
	pub fn version(&self) -> &str {
		&self.version
	}

	/// Builds the page object that `render` would send for this request.
	///
	/// Partial-reload headers are applied when they target this component.
	/// Flashed [`ValidationErrors`] found in the request extensions are then
	/// merged under `errors`, so a partial reload always carries them.
	pub fn page_object(&self, request: &Request, component: PageName, props: Props) -> PageObject {
		let mut props = props;

		if request.header(X_INERTIA_PARTIAL_COMPONENT) == Some(component.as_str()) {
			if let Some(only) = request.header(X_INERTIA_PARTIAL_DATA) {
				props.retain_only(split_list(only));
			}
			if let Some(except) = request.header(X_INERTIA_PARTIAL_EXCEPT) {
				props.remove_all(split_list(except));
			}
		}

		// Partial reloads never filter out validation errors.
		if let Some(errors) = request.extensions.get::<ValidationErrors>()
			&& !errors.is_empty()
		{
			props.insert(ERRORS_KEY, errors.to_value());
		}

		PageObject::new(component, props, request.path_and_query(), self.version.clone())
	}

	/// Renders `component` with `props` for `request`.
	///
	/// # Errors
	///
	/// Returns a serialization error if the page object cannot be encoded.
	pub fn render(&self, request: &Request, component: PageName, props: Props) -> Result<Response> {
		let page = self.page_object(request, component, props);
		tracing::debug!(component = %page.component, url = %page.url, "rendering page");

		if is_page_visit(request) {
			Ok(Response::ok()
				.with_json(&page)?
				.with_header(X_INERTIA, "true")
				.with_header("vary", "X-Inertia"))
		} else {
			let html = self.shell.render(&page).map_err(pagewire_http::Error::from)?;
			Ok(Response::ok().with_html(html).with_header("vary", "X-Inertia"))
		}
	}
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
	value.split(',').map(str::trim).filter(|s| !s.is_empty())
}
