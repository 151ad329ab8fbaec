//! # Pagewire
//!
//! A server-rendered single-page application scaffold.
//!
//! Server routes resolve to named pages plus an initial property bag; the
//! client resolves the page name to a component, wraps it in a layout and
//! swaps it in place on later navigations. The moving parts live in the
//! workspace crates and are re-exported here:
//!
//! - [`urls`]: the route registry with guest/authenticated gates
//! - [`pages`]: the page protocol, component registry and page resolver
//! - [`auth`]: users, sessions and the login/register/logout handlers
//! - [`middleware`], [`conf`], [`server`]: pipeline, settings and HTTP server
//!
//! This crate wires them into the scaffold application:
//!
//! ```rust,no_run
//! use pagewire::{Application, Settings};
//!
//! # async fn run() -> Result<(), pagewire::AppError> {
//! let app = Application::from_settings(Settings::default())?;
//! app.serve(pagewire::server::shutdown_signal()).await?;
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod dispatch;
pub mod routes;

pub use pagewire_auth as auth;
pub use pagewire_conf as conf;
pub use pagewire_http as http;
pub use pagewire_middleware as middleware;
pub use pagewire_pages as pages;
pub use pagewire_server as server;
pub use pagewire_urls as urls;

pub use app::{AppError, Application, BUILTIN_PAGES, DEFAULT_LAYOUT};
pub use dispatch::RouterHandler;
pub use pagewire_conf::{RouteSet, Settings};
pub use routes::{AuthHandlers, auth_routes, build_registry, demo_routes};
