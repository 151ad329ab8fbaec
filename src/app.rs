//! Application assembly.
//!
//! Builds every boot-time structure from [`Settings`] in one pass: the
//! component registry, the route table, the auth collaborator and the
//! middleware pipeline. A route that names a page with no component fails
//! here, before the server binds.

use pagewire_auth::{
	Argon2Hasher, InMemoryUserStore, LoginHandler, LogoutHandler, RegisterHandler, SessionConfig,
	SessionStore,
};
use pagewire_conf::{Settings, SettingsError};
use pagewire_http::{Handler, MiddlewareChain};
use pagewire_middleware::{AuthenticationMiddleware, LoggingMiddleware, SessionMiddleware};
use pagewire_pages::registry::DEFAULT_EXTENSION;
use pagewire_pages::{
	ComponentRegistry, HtmlShell, Layout, PageError, PageMiddleware, PageResolver, PageResponder,
};
use pagewire_server::{HttpServer, ServerError};
use pagewire_urls::{RegistryError, RouteRegistry};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::dispatch::RouterHandler;
use crate::routes::{AuthHandlers, build_registry};

/// Layout wrapped around every page that does not declare its own.
pub const DEFAULT_LAYOUT: &str = "Layout";

/// Pages shipped with the scaffold, registered when no page directory is
/// configured.
pub const BUILTIN_PAGES: &[&str] = &["Home", "Dashboard", "Auth/Login", "Auth/Register", "About"];

/// Errors that prevent the application from starting.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error(transparent)]
	Settings(#[from] SettingsError),

	#[error("Invalid route table: {0}")]
	Routes(#[from] RegistryError),

	#[error("Page components: {0}")]
	Pages(#[from] PageError),

	#[error(transparent)]
	Server(#[from] ServerError),
}

/// The assembled application.
pub struct Application {
	settings: Settings,
	registry: Arc<RouteRegistry>,
	resolver: Arc<PageResolver>,
	users: Arc<InMemoryUserStore>,
	sessions: Arc<SessionStore>,
	handler: Arc<dyn Handler>,
}

impl Application {
	/// Builds the application described by `settings`.
	///
	/// # Errors
	///
	/// Returns [`AppError`] if the settings are invalid, the route table does
	/// not compile, page discovery fails, or a routed page has no component.
	pub fn from_settings(settings: Settings) -> Result<Self, AppError> {
		settings.validate()?;

		let components = Arc::new(component_registry(&settings)?);
		let resolver = Arc::new(PageResolver::new(components, Layout::new(DEFAULT_LAYOUT)));

		let users = Arc::new(InMemoryUserStore::new());
		let hasher = Arc::new(Argon2Hasher::new());
		let handlers = AuthHandlers {
			login: Arc::new(
				LoginHandler::new(users.clone(), hasher.clone())
					.with_home_url(&settings.home_url)
					.with_login_url(&settings.login_url),
			),
			register: Arc::new(
				RegisterHandler::new(users.clone(), hasher).with_home_url(&settings.home_url),
			),
			logout: Arc::new(LogoutHandler::new()),
		};

		let registry = Arc::new(build_registry(
			settings.route_set,
			&handlers,
			&settings.login_url,
			&settings.home_url,
		)?);
		resolver.ensure_complete(&registry.page_names())?;

		let sessions = Arc::new(SessionStore::new());
		let session_config = SessionConfig::default()
			.with_secure(settings.session_cookie_secure)
			.with_ttl(Duration::from_secs(settings.session_ttl_secs));

		let responder = PageResponder::new(
			settings.asset_version.clone(),
			HtmlShell::new(settings.app_name.clone()),
		);
		let router = RouterHandler::new(registry.clone(), responder);
		let handler: Arc<dyn Handler> = Arc::new(
			MiddlewareChain::new(Arc::new(router))
				.with_middleware(Arc::new(LoggingMiddleware::new()))
				// Stale page visits are turned away before they touch the session.
				.with_middleware(Arc::new(PageMiddleware::new(settings.asset_version.clone())))
				.with_middleware(Arc::new(SessionMiddleware::with_store(
					sessions.clone(),
					session_config,
				)))
				.with_middleware(Arc::new(AuthenticationMiddleware::new(users.clone()))),
		);

		info!(
			route_set = %settings.route_set,
			routes = registry.len(),
			pages = resolver.registry().len(),
			"Application assembled"
		);

		Ok(Self {
			settings,
			registry,
			resolver,
			users,
			sessions,
			handler,
		})
	}

	/// The full request pipeline.
	pub fn handler(&self) -> Arc<dyn Handler> {
		self.handler.clone()
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	pub fn registry(&self) -> &Arc<RouteRegistry> {
		&self.registry
	}

	/// Resolver for the client side of the page protocol.
	pub fn resolver(&self) -> &Arc<PageResolver> {
		&self.resolver
	}

	pub fn users(&self) -> &Arc<InMemoryUserStore> {
		&self.users
	}

	pub fn sessions(&self) -> &Arc<SessionStore> {
		&self.sessions
	}

	/// Serves the application on the configured address until `shutdown`
	/// resolves.
	pub async fn serve(self, shutdown: impl Future<Output = ()> + Send) -> Result<(), AppError> {
		let addr = self.settings.socket_addr()?;
		HttpServer::new(self.handler)
			.listen_with_shutdown(addr, shutdown)
			.await?;
		Ok(())
	}
}

fn component_registry(settings: &Settings) -> Result<ComponentRegistry, PageError> {
	match &settings.pages_dir {
		Some(dir) => {
			info!(dir = %dir.display(), "Discovering page components");
			ComponentRegistry::discover(dir, DEFAULT_EXTENSION)
		}
		None => BUILTIN_PAGES
			.iter()
			.fold(ComponentRegistry::builder(), |builder, page| {
				builder.register(*page, format!("Pages/{page}.{DEFAULT_EXTENSION}"))
			})
			.build(),
	}
}

impl std::fmt::Debug for Application {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Application")
			.field("settings", &self.settings)
			.field("registry", &self.registry)
			.finish_non_exhaustive()
	}
}
