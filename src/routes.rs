//! The scaffold's route tables.
//!
//! | Method | Path | Result |
//! |---|---|---|
//! | GET | `/` | page `Home` |
//! | GET | `/dashboard` | page `Dashboard` (authenticated) |
//! | POST | `/logout` | logout handler (authenticated) |
//! | GET | `/register` | page `Auth/Register` (guest) |
//! | POST | `/register` | register handler (guest) |
//! | GET | `/login` | page `Auth/Login` (guest) |
//! | POST | `/login` | login handler (guest) |
//! | GET | `/about` | page `About` with `{user: "Tameem"}` |
//!
//! The first seven form the auth table, `/about` the demo table.

use pagewire_auth::{LoginHandler, LogoutHandler, RegisterHandler};
use pagewire_conf::RouteSet;
use pagewire_pages::Props;
use pagewire_urls::{
	RegistryError, Route, RouteGroup, RouteRegistry, RouteRegistryBuilder, RouteTarget,
};
use std::sync::Arc;

/// Handlers behind the auth table's POST routes.
#[derive(Clone)]
pub struct AuthHandlers {
	pub login: Arc<LoginHandler>,
	pub register: Arc<RegisterHandler>,
	pub logout: Arc<LogoutHandler>,
}

/// Home, dashboard and the login/register/logout flow.
pub fn auth_routes(handlers: &AuthHandlers) -> Vec<RouteGroup> {
	vec![
		RouteGroup::public().route(Route::page("/", "Home").name("home")),
		RouteGroup::authenticated()
			.route(Route::page("/dashboard", "Dashboard").name("dashboard"))
			.route(
				Route::post("/logout", RouteTarget::Handler(handlers.logout.clone())).name("logout"),
			),
		RouteGroup::guest()
			.route(Route::page("/register", "Auth/Register").name("register"))
			.route(Route::post(
				"/register",
				RouteTarget::Handler(handlers.register.clone()),
			))
			.route(Route::page("/login", "Auth/Login").name("login"))
			.route(Route::post("/login", RouteTarget::Handler(handlers.login.clone()))),
	]
}

/// The `/about` demo page.
pub fn demo_routes() -> Vec<RouteGroup> {
	vec![
		RouteGroup::public().route(
			Route::page("/about", "About")
				.with_props(Props::new().with("user", "Tameem"))
				.name("about"),
		),
	]
}

/// Builds the registry for `route_set`.
///
/// # Errors
///
/// Fails when the tables contain an invalid pattern or page name, or a
/// duplicate route or route name.
pub fn build_registry(
	route_set: RouteSet,
	handlers: &AuthHandlers,
	login_url: &str,
	home_url: &str,
) -> Result<RouteRegistry, RegistryError> {
	let groups = match route_set {
		RouteSet::Auth => auth_routes(handlers),
		RouteSet::Demo => demo_routes(),
		RouteSet::Full => {
			let mut groups = auth_routes(handlers);
			groups.extend(demo_routes());
			groups
		}
	};

	groups
		.into_iter()
		.fold(RouteRegistry::builder(), RouteRegistryBuilder::group)
		.with_login_url(login_url)
		.with_home_url(home_url)
		.build()
}

#[cfg(test)]
mod tests {
	use super::*;
	use pagewire_auth::{Argon2Hasher, InMemoryUserStore};
	use rstest::{fixture, rstest};

	#[fixture]
	fn handlers() -> AuthHandlers {
		let users = Arc::new(InMemoryUserStore::new());
		let hasher = Arc::new(Argon2Hasher::new());
		AuthHandlers {
			login: Arc::new(LoginHandler::new(users.clone(), hasher.clone())),
			register: Arc::new(RegisterHandler::new(users, hasher)),
			logout: Arc::new(LogoutHandler::new()),
		}
	}

	#[rstest]
	#[case(RouteSet::Auth, 7, vec!["Home", "Dashboard", "Auth/Register", "Auth/Login"])]
	#[case(RouteSet::Demo, 1, vec!["About"])]
	#[case(RouteSet::Full, 8, vec!["Home", "Dashboard", "Auth/Register", "Auth/Login", "About"])]
	fn test_route_sets(
		handlers: AuthHandlers,
		#[case] route_set: RouteSet,
		#[case] expected_routes: usize,
		#[case] expected_pages: Vec<&str>,
	) {
		let registry = build_registry(route_set, &handlers, "/login", "/dashboard").unwrap();

		let pages: Vec<String> = registry
			.page_names()
			.into_iter()
			.map(|name| name.as_str().to_string())
			.collect();
		assert_eq!(registry.len(), expected_routes);
		assert_eq!(pages, expected_pages);
	}

	#[rstest]
	fn test_named_routes(handlers: AuthHandlers) {
		let registry = build_registry(RouteSet::Full, &handlers, "/login", "/dashboard").unwrap();

		for (name, url) in [
			("home", "/"),
			("dashboard", "/dashboard"),
			("logout", "/logout"),
			("register", "/register"),
			("login", "/login"),
			("about", "/about"),
		] {
			assert_eq!(registry.url_for(name).unwrap(), url);
		}
	}
}
