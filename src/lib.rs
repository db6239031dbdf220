//! # Trellis
//!
//! A thin, versioned web-API framework for Rust.
//!
//! Trellis keeps the surface small: Rails-style route patterns with optional
//! segments, version-prefixed route groups, and a single `params()` view that
//! merges path captures, query-string pairs, and body parameters for a
//! handler. Everything is async and handler-shaped, so apps compose with
//! middleware and drive cleanly under an in-process test client.
//!
//! ## Quick Example
//!
//! ```rust
//! use trellis::prelude::*;
//!
//! async fn show_user(req: Request) -> trellis::Result<Response> {
//!     Response::ok().with_json(&req.params())
//! }
//!
//! let app = App::builder()
//!     .version("v1", |v| {
//!         v.get("users/:id(.:format)", show_user);
//!         v.post("users", show_user);
//!     })
//!     .build()
//!     .unwrap();
//! ```
//!
//! `GET /v1/users/1.json` then reaches `show_user` with
//! `{"id": "1", "format": "json"}` in `req.params()`.

pub use trellis_app as app;
pub use trellis_core as core;
pub use trellis_http as http;
pub use trellis_urls as urls;

pub use trellis_app::{App, AppBuilder, VersionGroup};
pub use trellis_core::{Error, Result};
pub use trellis_http::{
	Extensions, Handler, Middleware, MiddlewareChain, PreparsedParams, Request, RequestBuilder,
	Response,
};
pub use trellis_urls::{ApiRouter, PatternError, Route, RoutePattern, Router};

/// Commonly used imports, in one place.
pub mod prelude {
	pub use crate::app::{App, AppBuilder, VersionGroup};
	pub use crate::core::{Error, Result};
	pub use crate::http::{
		Extensions, Handler, Middleware, MiddlewareChain, PreparsedParams, Request, Response,
	};
	pub use crate::urls::{ApiRouter, Route, RoutePattern, Router};
	pub use hyper::Method;
}

pub use hyper::Method;
