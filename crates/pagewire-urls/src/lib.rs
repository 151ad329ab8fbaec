//! Route registry for pagewire.
//!
//! Maps an HTTP method and path to either a named page with its initial props
//! or an imperative handler. Routes are organised in ordered
//! [`RouteGroup`]s, each guarded by an ordered list of [`Gate`]s.
//!
//! ## Example
//!
//! ```rust
//! use pagewire_http::{AuthState, Method};
//! use pagewire_pages::Props;
//! use pagewire_urls::{Resolution, Route, RouteGroup, RouteRegistry};
//!
//! let registry = RouteRegistry::builder()
//!     .group(
//!         RouteGroup::public()
//!             .route(Route::page("/", "Home").name("home"))
//!             .route(
//!                 Route::page("/about", "About")
//!                     .with_props(Props::new().with("user", "Tameem"))
//!                     .name("about"),
//!             ),
//!     )
//!     .build()
//!     .unwrap();
//!
//! match registry.resolve(&Method::GET, "/about", &AuthState::anonymous()) {
//!     Resolution::Page { page, props, .. } => {
//!         assert_eq!(page.as_str(), "About");
//!         assert_eq!(props, Props::new().with("user", "Tameem"));
//!     }
//!     other => panic!("unexpected resolution: {other:?}"),
//! }
//! assert_eq!(registry.url_for("home").unwrap(), "/");
//! ```

pub mod error;
pub mod gate;
pub mod group;
pub mod pattern;
pub mod registry;
pub mod route;

pub use error::{RegistryError, Result};
pub use gate::{Gate, GateRedirects};
pub use group::RouteGroup;
pub use pattern::PathPattern;
pub use registry::{Resolution, RouteInfo, RouteRegistry, RouteRegistryBuilder};
pub use route::{Route, RouteTarget};
