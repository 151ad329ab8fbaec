//! The static route table.
//!
//! Built once at process start from ordered [`RouteGroup`]s and immutable
//! afterwards. Resolution walks routes in registration order; the first route
//! whose method and pattern match wins, and that route's group gates then
//! decide between matching and redirecting.

use pagewire_http::{AuthState, Handler, Method};
use pagewire_pages::{PageName, Props};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::{Gate, GateRedirects, PathPattern, RegistryError, Result, RouteGroup, RouteTarget};

/// Outcome of resolving a request against the registry.
#[derive(Clone)]
pub enum Resolution {
	/// Render a page with the route's initial props.
	Page {
		page: PageName,
		props: Props,
		params: HashMap<String, String>,
	},
	/// Delegate to the route's handler.
	Handler {
		handler: Arc<dyn Handler>,
		params: HashMap<String, String>,
	},
	/// The caller failed the route's gate.
	Redirect { location: String, gate: Gate },
	/// No route matches the method and path.
	NotFound,
}

impl fmt::Debug for Resolution {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Resolution::Page {
				page,
				props,
				params,
			} => f
				.debug_struct("Page")
				.field("page", page)
				.field("props", props)
				.field("params", params)
				.finish(),
			Resolution::Handler { params, .. } => f
				.debug_struct("Handler")
				.field("params", params)
				.finish_non_exhaustive(),
			Resolution::Redirect { location, gate } => f
				.debug_struct("Redirect")
				.field("location", location)
				.field("gate", gate)
				.finish(),
			Resolution::NotFound => f.write_str("NotFound"),
		}
	}
}

#[derive(Clone)]
enum CompiledTarget {
	Page { page: PageName, props: Props },
	Handler(Arc<dyn Handler>),
}

struct CompiledRoute {
	method: Method,
	pattern: PathPattern,
	target: CompiledTarget,
	name: Option<String>,
	group: Arc<str>,
	gates: Arc<[Gate]>,
}

/// Read-only description of a registered route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
	pub method: Method,
	pub pattern: String,
	pub name: Option<String>,
	pub group: String,
	/// The rendered page, for page routes.
	pub page: Option<PageName>,
}

/// Immutable, ordered route table.
pub struct RouteRegistry {
	routes: Vec<CompiledRoute>,
	redirects: GateRedirects,
}

impl RouteRegistry {
	pub fn builder() -> RouteRegistryBuilder {
		RouteRegistryBuilder::default()
	}

	/// Resolves a request for `caller`.
	///
	/// HEAD requests match GET routes. Trailing slashes are ignored except on
	/// the root path.
	///
	/// # Examples
	///
	/// ```
	/// use pagewire_http::{AuthState, Method};
	/// use pagewire_urls::{Resolution, Route, RouteGroup, RouteRegistry};
	///
	/// let registry = RouteRegistry::builder()
	///     .group(RouteGroup::public().route(Route::page("/", "Home")))
	///     .group(RouteGroup::authenticated().route(Route::page("/dashboard", "Dashboard")))
	///     .build()
	///     .unwrap();
	///
	/// let guest = AuthState::anonymous();
	/// assert!(matches!(registry.resolve(&Method::GET, "/", &guest), Resolution::Page { .. }));
	/// assert!(matches!(
	///     registry.resolve(&Method::GET, "/dashboard", &guest),
	///     Resolution::Redirect { ref location, .. } if location == "/login"
	/// ));
	/// assert!(matches!(registry.resolve(&Method::GET, "/nope", &guest), Resolution::NotFound));
	/// ```
	pub fn resolve(&self, method: &Method, path: &str, caller: &AuthState) -> Resolution {
		let path = normalize_path(path);
		let method = if *method == Method::HEAD {
			&Method::GET
		} else {
			method
		};

		let matched = self.routes.iter().find_map(|route| {
			if &route.method != method {
				return None;
			}
			route.pattern.matches(path).map(|params| (route, params))
		});

		let Some((route, params)) = matched else {
			tracing::debug!(%method, path, "no route matched");
			return Resolution::NotFound;
		};

		for gate in route.gates.iter() {
			if let Some(location) = gate.check(caller, &self.redirects) {
				tracing::debug!(
					%method,
					path,
					group = %route.group,
					%gate,
					location,
					"route gate rejected caller"
				);
				return Resolution::Redirect {
					location: location.to_string(),
					gate: *gate,
				};
			}
		}

		tracing::debug!(%method, path, route = route.name.as_deref().unwrap_or("-"), "route matched");
		match &route.target {
			CompiledTarget::Page { page, props } => Resolution::Page {
				page: page.clone(),
				props: props.clone(),
				params,
			},
			CompiledTarget::Handler(handler) => Resolution::Handler {
				handler: handler.clone(),
				params,
			},
		}
	}

	/// Builds the URL of a named route.
	///
	/// # Errors
	///
	/// Returns [`RegistryError::UnknownRoute`] or
	/// [`RegistryError::MissingParameter`].
	pub fn reverse(&self, name: &str, params: &HashMap<String, String>) -> Result<String> {
		let route = self
			.routes
			.iter()
			.find(|route| route.name.as_deref() == Some(name))
			.ok_or_else(|| RegistryError::UnknownRoute(name.to_string()))?;

		route
			.pattern
			.reverse(params)
			.map_err(|param| RegistryError::MissingParameter {
				route: name.to_string(),
				param,
			})
	}

	/// URL of a named route without parameters.
	pub fn url_for(&self, name: &str) -> Result<String> {
		self.reverse(name, &HashMap::new())
	}

	/// Every page referenced by a page route, deduplicated, in route order.
	pub fn page_names(&self) -> Vec<PageName> {
		let mut seen = HashSet::new();
		self.routes
			.iter()
			.filter_map(|route| match &route.target {
				CompiledTarget::Page { page, .. } => Some(page),
				CompiledTarget::Handler(_) => None,
			})
			.filter(|page| seen.insert((*page).clone()))
			.cloned()
			.collect()
	}

	/// Describes every route in registration order.
	pub fn routes(&self) -> Vec<RouteInfo> {
		self.routes
			.iter()
			.map(|route| RouteInfo {
				method: route.method.clone(),
				pattern: route.pattern.pattern().to_string(),
				name: route.name.clone(),
				group: route.group.to_string(),
				page: match &route.target {
					CompiledTarget::Page { page, .. } => Some(page.clone()),
					CompiledTarget::Handler(_) => None,
				},
			})
			.collect()
	}

	pub fn len(&self) -> usize {
		self.routes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}

	pub fn redirects(&self) -> &GateRedirects {
		&self.redirects
	}
}

impl fmt::Debug for RouteRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteRegistry")
			.field("routes", &self.routes())
			.field("redirects", &self.redirects)
			.finish()
	}
}

fn normalize_path(path: &str) -> &str {
	let trimmed = path.trim_end_matches('/');
	if trimmed.is_empty() { "/" } else { trimmed }
}

/// Builder for [`RouteRegistry`]
#[derive(Debug, Default)]
pub struct RouteRegistryBuilder {
	groups: Vec<RouteGroup>,
	redirects: GateRedirects,
}

impl RouteRegistryBuilder {
	/// Appends a group; groups are matched in the order they are added.
	pub fn group(mut self, group: RouteGroup) -> Self {
		self.groups.push(group);
		self
	}

	pub fn with_redirects(mut self, redirects: GateRedirects) -> Self {
		self.redirects = redirects;
		self
	}

	/// Sets where anonymous callers are sent by authenticated-only routes.
	pub fn with_login_url(mut self, url: impl Into<String>) -> Self {
		self.redirects.login_url = url.into();
		self
	}

	/// Sets where authenticated callers are sent by guest-only routes.
	pub fn with_home_url(mut self, url: impl Into<String>) -> Self {
		self.redirects.home_url = url.into();
		self
	}

	/// Compiles patterns, validates page names and freezes the table.
	///
	/// # Errors
	///
	/// Fails on invalid patterns or page names, on a repeated route name, and
	/// when two routes share a method and a pattern that match the same paths
	/// (`/about` and `/about/`, or `/u/{id}` and `/u/{name}`).
	pub fn build(self) -> Result<RouteRegistry> {
		let mut routes = Vec::new();
		let mut seen_routes: HashSet<(Method, String)> = HashSet::new();
		let mut seen_names: HashSet<String> = HashSet::new();

		for group in self.groups {
			let (label, gates, group_routes) = group.into_parts();
			let label: Arc<str> = Arc::from(label);
			let gates: Arc<[Gate]> = Arc::from(gates);

			for route in group_routes {
				let (method, path, target, name) = route.into_parts();
				let pattern = PathPattern::new(&path)?;

				if !seen_routes.insert((method.clone(), pattern.shape())) {
					return Err(RegistryError::DuplicateRoute {
						method,
						pattern: path,
					});
				}
				if let Some(name) = &name
					&& !seen_names.insert(name.clone())
				{
					return Err(RegistryError::DuplicateName(name.clone()));
				}

				let target = match target {
					RouteTarget::Page { page, props } => CompiledTarget::Page {
						page: PageName::new(&page).map_err(|e| RegistryError::InvalidPage {
							pattern: path.clone(),
							message: e.to_string(),
						})?,
						props,
					},
					RouteTarget::Handler(handler) => CompiledTarget::Handler(handler),
				};

				routes.push(CompiledRoute {
					method,
					pattern,
					target,
					name,
					group: label.clone(),
					gates: gates.clone(),
				});
			}
		}

		tracing::debug!(routes = routes.len(), "route registry built");
		Ok(RouteRegistry {
			routes,
			redirects: self.redirects,
		})
	}
}
