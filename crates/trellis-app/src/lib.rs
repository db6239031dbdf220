//! Application builder for trellis APIs.
//!
//! An [`App`] is built declaratively: each `version` block registers routes
//! mounted under the version's URL prefix, namespaced by version name. The
//! built app implements [`Handler`] and can be driven directly, by a test
//! client or by whatever server front-end hosts it.
//!
//! ```
//! use trellis_app::App;
//! use trellis_http::{Request, Response};
//!
//! async fn show(req: Request) -> trellis_core::Result<Response> {
//!     Response::ok().with_json(&req.params())
//! }
//!
//! let app = App::builder()
//!     .version("v1", |v| {
//!         v.get("users/:id(.:format)", show);
//!         v.post("users", show);
//!     })
//!     .build()
//!     .unwrap();
//! ```

use async_trait::async_trait;
use hyper::Method;
use std::sync::Arc;
use tracing::debug;
use trellis_http::{Handler, Request, Response};
use trellis_urls::{ApiRouter, PatternError, Route, Router};

/// A built application: a router behind a [`Handler`] facade.
pub struct App {
	router: Arc<ApiRouter>,
}

impl App {
	/// Start building an application.
	pub fn builder() -> AppBuilder {
		AppBuilder {
			router: ApiRouter::new(),
			error: None,
		}
	}

	/// The underlying router.
	pub fn router(&self) -> &ApiRouter {
		&self.router
	}

	/// The app as a shared handler.
	pub fn into_handler(self) -> Arc<dyn Handler> {
		self.router
	}
}

#[async_trait]
impl Handler for App {
	async fn handle(&self, request: Request) -> trellis_core::Result<Response> {
		self.router.route(request).await
	}
}

/// Builder for [`App`].
///
/// Pattern-compilation errors inside registration closures are collected and
/// surfaced once, from [`build`](AppBuilder::build). The first error wins.
pub struct AppBuilder {
	router: ApiRouter,
	error: Option<PatternError>,
}

impl AppBuilder {
	/// Register a block of routes mounted under `/{name}`, namespaced by
	/// the version name.
	pub fn version(self, name: &str, register: impl FnOnce(&mut VersionGroup)) -> Self {
		let name = name.trim_matches('/').to_string();
		let prefix = format!("/{name}");
		self.mount_group(&prefix, Some(name), register)
	}

	/// Register a block of routes mounted under an arbitrary prefix, with
	/// no namespace. Use `""` for the root.
	pub fn prefix(self, prefix: &str, register: impl FnOnce(&mut VersionGroup)) -> Self {
		self.mount_group(prefix, None, register)
	}

	fn mount_group(
		mut self,
		prefix: &str,
		namespace: Option<String>,
		register: impl FnOnce(&mut VersionGroup),
	) -> Self {
		let mut group = VersionGroup {
			routes: Vec::new(),
			error: None,
		};
		register(&mut group);

		if self.error.is_none() {
			self.error = group.error;
		}
		if self.error.is_none()
			&& let Err(e) = self.router.mount(prefix, group.routes, namespace.clone())
		{
			self.error = Some(e);
		}
		debug!(prefix, namespace = ?namespace, "mounted route group");
		self
	}

	/// Build the application.
	///
	/// # Errors
	///
	/// Returns the first [`PatternError`] produced by any registered path.
	pub fn build(self) -> Result<App, PatternError> {
		match self.error {
			Some(error) => Err(error),
			None => Ok(App {
				router: Arc::new(self.router),
			}),
		}
	}
}

/// Collects the routes registered inside a `version` or `prefix` block.
pub struct VersionGroup {
	routes: Vec<Route>,
	error: Option<PatternError>,
}

impl VersionGroup {
	/// Register a route for an arbitrary method.
	pub fn route<F, Fut>(&mut self, method: Method, path: &str, func: F) -> &mut Self
	where
		F: Fn(Request) -> Fut + Send + Sync + 'static,
		Fut: std::future::Future<Output = trellis_core::Result<Response>> + Send + 'static,
	{
		match Route::from_fn(method, path, func) {
			Ok(route) => self.routes.push(route),
			Err(e) => {
				if self.error.is_none() {
					self.error = Some(e);
				}
			}
		}
		self
	}

	/// Register a GET route.
	pub fn get<F, Fut>(&mut self, path: &str, func: F) -> &mut Self
	where
		F: Fn(Request) -> Fut + Send + Sync + 'static,
		Fut: std::future::Future<Output = trellis_core::Result<Response>> + Send + 'static,
	{
		self.route(Method::GET, path, func)
	}

	/// Register a POST route.
	pub fn post<F, Fut>(&mut self, path: &str, func: F) -> &mut Self
	where
		F: Fn(Request) -> Fut + Send + Sync + 'static,
		Fut: std::future::Future<Output = trellis_core::Result<Response>> + Send + 'static,
	{
		self.route(Method::POST, path, func)
	}

	/// Register a PUT route.
	pub fn put<F, Fut>(&mut self, path: &str, func: F) -> &mut Self
	where
		F: Fn(Request) -> Fut + Send + Sync + 'static,
		Fut: std::future::Future<Output = trellis_core::Result<Response>> + Send + 'static,
	{
		self.route(Method::PUT, path, func)
	}

	/// Register a DELETE route.
	pub fn delete<F, Fut>(&mut self, path: &str, func: F) -> &mut Self
	where
		F: Fn(Request) -> Fut + Send + Sync + 'static,
		Fut: std::future::Future<Output = trellis_core::Result<Response>> + Send + 'static,
	{
		self.route(Method::DELETE, path, func)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	async fn echo_params(req: Request) -> trellis_core::Result<Response> {
		Response::ok().with_json(&req.params())
	}

	#[test]
	fn test_version_mounts_routes_under_prefix() {
		let app = App::builder()
			.version("v1", |v| {
				v.get("users/:id(.:format)", echo_params);
				v.post("users", echo_params);
			})
			.build()
			.unwrap();

		let routes = app.router().get_routes();
		assert_eq!(routes.len(), 2);
		assert_eq!(routes[0].path, "/v1/users/:id(.:format)");
		assert_eq!(routes[1].path, "/v1/users");
		assert_eq!(app.router().namespaces(), vec!["v1".to_string()]);
	}

	#[test]
	fn test_multiple_versions_coexist() {
		let app = App::builder()
			.version("v1", |v| {
				v.get("users/:id", echo_params);
			})
			.version("v2", |v| {
				v.get("users/:id", echo_params);
			})
			.build()
			.unwrap();

		assert_eq!(
			app.router().namespaces(),
			vec!["v1".to_string(), "v2".to_string()]
		);
	}

	#[test]
	fn test_prefix_mounts_without_namespace() {
		let app = App::builder()
			.prefix("/internal", |v| {
				v.get("status", echo_params);
			})
			.build()
			.unwrap();

		let routes = app.router().get_routes();
		assert_eq!(routes[0].path, "/internal/status");
		assert_eq!(routes[0].namespace, None);
	}

	#[test]
	fn test_invalid_pattern_surfaces_at_build() {
		let result = App::builder()
			.version("v1", |v| {
				v.get("users/(:id", echo_params);
			})
			.build();

		assert!(result.is_err());
	}

	#[rstest]
	#[tokio::test]
	async fn test_built_app_dispatches_requests() {
		let app = App::builder()
			.version("v1", |v| {
				v.get("users/:id(.:format)", echo_params);
			})
			.build()
			.unwrap();

		let request = Request::builder()
			.method(Method::GET)
			.uri("/v1/users/1.json")
			.build()
			.unwrap();
		let response = app.handle(request).await.unwrap();

		let params: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
		assert_eq!(params["id"], "1");
		assert_eq!(params["format"], "json");
	}
}
