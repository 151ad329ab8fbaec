//! Testing utilities for pagewire applications.
//!
//! [`TestClient`] drives a handler in-process, keeping cookies between
//! requests like a browser, and [`TestResponse`] decodes page objects from
//! both JSON page visits and first-load HTML documents.

pub mod assertions;
pub mod client;
pub mod response;

pub use assertions::{assert_page, assert_redirect, assert_status};
pub use client::TestClient;
pub use response::TestResponse;
