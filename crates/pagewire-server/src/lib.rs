//! HTTP server for pagewire.
//!
//! Serves any [`Handler`](pagewire_http::Handler) over HTTP/1.1 with hyper,
//! stopping gracefully when a shutdown future resolves.

pub mod http;
pub mod shutdown;

pub use http::{HttpServer, ServerError, serve};
pub use shutdown::shutdown_signal;
