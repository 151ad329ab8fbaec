//! HTTP primitives for pagewire.
//!
//! This crate provides the request/response representation shared by every
//! other pagewire crate, together with the composition traits used to build
//! the request pipeline:
//!
//! - [`Request`] / [`Response`]: owned HTTP messages with a fully read body
//! - [`Extensions`]: type-keyed storage attached to a request
//! - [`AuthState`]: the caller identity published by authentication middleware
//! - [`Handler`] / [`Middleware`] / [`MiddlewareChain`]: the pipeline abstractions
//!
//! ## Example
//!
//! ```rust
//! use pagewire_http::{Handler, Request, Response, Result};
//! use async_trait::async_trait;
//!
//! struct Hello;
//!
//! #[async_trait]
//! impl Handler for Hello {
//!     async fn handle(&self, _request: Request) -> Result<Response> {
//!         Ok(Response::ok().with_body("Hello!"))
//!     }
//! }
//! ```

pub mod auth_state;
pub mod error;
pub mod extensions;
pub mod middleware;
pub mod request;
pub mod response;

pub use auth_state::AuthState;
pub use error::{Error, Result};
pub use extensions::Extensions;
pub use middleware::{Handler, Middleware, MiddlewareChain};
pub use request::{Request, RequestBuilder};
pub use response::Response;

// Re-export the hyper types that appear in the public API
pub use hyper::{HeaderMap, Method, StatusCode, Uri, Version};
