//! Route groups sharing an ordered list of gates.

use crate::{Gate, Route};

/// An ordered set of routes guarded by the same gates.
///
/// Gates are evaluated in the order they were added; the first failing gate
/// decides the redirect.
///
/// # Examples
///
/// ```
/// use pagewire_urls::{Gate, Route, RouteGroup};
///
/// let group = RouteGroup::guest()
///     .route(Route::page("/login", "Auth/Login").name("login"))
///     .route(Route::page("/register", "Auth/Register").name("register"));
///
/// assert_eq!(group.gates(), &[Gate::Guest]);
/// assert_eq!(group.routes().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct RouteGroup {
	label: String,
	gates: Vec<Gate>,
	routes: Vec<Route>,
}

impl RouteGroup {
	pub fn new(label: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			gates: Vec::new(),
			routes: Vec::new(),
		}
	}

	/// A group open to every caller.
	pub fn public() -> Self {
		Self::new("public")
	}

	/// A group only anonymous callers may reach.
	pub fn guest() -> Self {
		Self::new("guest").with_gate(Gate::Guest)
	}

	/// A group only authenticated callers may reach.
	pub fn authenticated() -> Self {
		Self::new("auth").with_gate(Gate::Authenticated)
	}

	pub fn with_gate(mut self, gate: Gate) -> Self {
		self.gates.push(gate);
		self
	}

	pub fn route(mut self, route: Route) -> Self {
		self.routes.push(route);
		self
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn gates(&self) -> &[Gate] {
		&self.gates
	}

	pub fn routes(&self) -> &[Route] {
		&self.routes
	}

	pub(crate) fn into_parts(self) -> (String, Vec<Gate>, Vec<Route>) {
		(self.label, self.gates, self.routes)
	}
}
