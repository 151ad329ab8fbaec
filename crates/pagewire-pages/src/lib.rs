//! Page protocol and page resolution for pagewire.
//!
//! The server answers each navigation with a [`PageObject`]
//! (`{component, props, url, version}`); the client looks the component up by
//! [`PageName`] in an immutable [`ComponentRegistry`] and renders it inside a
//! layout.
//!
//! ## Server side
//!
//! - [`PageResponder`]: renders a page either as JSON (page visits) or as the
//!   initial HTML document carrying the page object in `data-page`
//! - [`PageMiddleware`]: asset-version checks and redirect normalization
//!
//! ## Client side
//!
//! - [`ComponentRegistry`]: built once at boot, explicitly or by walking the
//!   page directory
//! - [`PageResolver`]: name lookup plus default-layout decoration
//! - [`PageApp`]: the bootstrap that mounts the first page and swaps pages on
//!   later visits
//!
//! ## Example
//!
//! ```rust
//! use pagewire_pages::{ComponentRegistry, Layout, PageName, PageResolver};
//! use std::sync::Arc;
//!
//! let registry = ComponentRegistry::builder()
//!     .register("Home", "./Pages/Home.vue")
//!     .register("Auth/Login", "./Pages/Auth/Login.vue")
//!     .build()
//!     .unwrap();
//!
//! let resolver = PageResolver::new(Arc::new(registry), Layout::new("Layout"));
//! let home = resolver.resolve(&PageName::new("Home").unwrap()).unwrap();
//!
//! assert_eq!(home.layout.as_ref().map(|l| l.name()), Some("Layout"));
//! ```

pub mod client;
pub mod component;
pub mod error;
pub mod headers;
pub mod middleware;
pub mod name;
pub mod page;
pub mod props;
pub mod registry;
pub mod resolver;
pub mod responder;
pub mod shell;

pub use client::{PageApp, Visit};
pub use component::{ComponentDefinition, Layout};
pub use error::{PageError, Result};
pub use middleware::PageMiddleware;
pub use name::PageName;
pub use page::PageObject;
pub use props::{Props, ValidationErrors};
pub use registry::{ComponentRegistry, ComponentRegistryBuilder};
pub use resolver::PageResolver;
pub use responder::PageResponder;
pub use shell::HtmlShell;
