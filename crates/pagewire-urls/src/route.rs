//! Route definitions.

use pagewire_http::{Handler, Method};
use pagewire_pages::Props;
use std::fmt;
use std::sync::Arc;

/// What a matched route produces.
#[derive(Clone)]
pub enum RouteTarget {
	/// Render a named page with a fixed initial property bag.
	Page { page: String, props: Props },
	/// Delegate to an imperative handler.
	Handler(Arc<dyn Handler>),
}

impl RouteTarget {
	/// A page target with no props.
	pub fn page(page: impl Into<String>) -> Self {
		RouteTarget::Page {
			page: page.into(),
			props: Props::new(),
		}
	}

	pub fn page_with_props(page: impl Into<String>, props: Props) -> Self {
		RouteTarget::Page {
			page: page.into(),
			props,
		}
	}

	pub fn handler<H: Handler + 'static>(handler: H) -> Self {
		RouteTarget::Handler(Arc::new(handler))
	}
}

impl fmt::Debug for RouteTarget {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RouteTarget::Page { page, props } => f
				.debug_struct("Page")
				.field("page", page)
				.field("props", props)
				.finish(),
			RouteTarget::Handler(_) => f.write_str("Handler(..)"),
		}
	}
}

/// An uncompiled route: method, path pattern, target and optional name.
///
/// Patterns and page names are validated when the registry is built.
///
/// # Examples
///
/// ```
/// use pagewire_pages::Props;
/// use pagewire_urls::Route;
///
/// let about = Route::page("/about", "About")
///     .with_props(Props::new().with("user", "Tameem"))
///     .name("about");
///
/// assert_eq!(about.path(), "/about");
/// assert_eq!(about.route_name(), Some("about"));
/// ```
#[derive(Debug, Clone)]
pub struct Route {
	method: Method,
	path: String,
	target: RouteTarget,
	name: Option<String>,
}

impl Route {
	pub fn new(method: Method, path: impl Into<String>, target: RouteTarget) -> Self {
		Self {
			method,
			path: path.into(),
			target,
			name: None,
		}
	}

	pub fn get(path: impl Into<String>, target: RouteTarget) -> Self {
		Self::new(Method::GET, path, target)
	}

	pub fn post(path: impl Into<String>, target: RouteTarget) -> Self {
		Self::new(Method::POST, path, target)
	}

	/// A GET route rendering `page` with empty props.
	pub fn page(path: impl Into<String>, page: impl Into<String>) -> Self {
		Self::get(path, RouteTarget::page(page))
	}

	/// Replaces the props of a page route; no effect on handler routes.
	pub fn with_props(mut self, props: Props) -> Self {
		if let RouteTarget::Page { props: current, .. } = &mut self.target {
			*current = props;
		}
		self
	}

	pub fn name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	pub fn method(&self) -> &Method {
		&self.method
	}

	pub fn path(&self) -> &str {
		&self.path
	}

	pub fn target(&self) -> &RouteTarget {
		&self.target
	}

	pub fn route_name(&self) -> Option<&str> {
		self.name.as_deref()
	}

	pub(crate) fn into_parts(self) -> (Method, String, RouteTarget, Option<String>) {
		(self.method, self.path, self.target, self.name)
	}
}
