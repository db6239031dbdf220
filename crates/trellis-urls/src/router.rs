//! Method-aware request dispatch.

use async_trait::async_trait;
use tracing::debug;
use trellis_core::exception::{Error, Result};
use trellis_http::{Handler, Request, Response};

use crate::pattern::PatternError;
use crate::route::Route;

/// Router trait - composes routes together.
pub trait Router: Send + Sync {
	fn add_route(&mut self, route: Route);

	/// Mount routes from another source under a prefix.
	///
	/// # Errors
	///
	/// Returns a [`PatternError`] when a prefixed path fails to compile.
	fn mount(
		&mut self,
		prefix: &str,
		routes: Vec<Route>,
		namespace: Option<String>,
	) -> std::result::Result<(), PatternError>;

	/// Dispatch a request to the matching route.
	fn route(&self, request: Request)
	-> impl std::future::Future<Output = Result<Response>> + Send;
}

/// Default router implementation.
///
/// Routes are tried in registration order. A route matches when its pattern
/// matches the whole request path and its method matches the request method;
/// a path-only match produces 405 instead of 404.
#[derive(Default)]
pub struct ApiRouter {
	routes: Vec<Route>,
}

impl ApiRouter {
	/// Create an empty router.
	pub fn new() -> Self {
		Self { routes: Vec::new() }
	}

	/// All registered routes.
	pub fn get_routes(&self) -> &[Route] {
		&self.routes
	}

	/// Unique namespaces across registered routes, sorted.
	///
	/// With version mounts these are the mounted API versions.
	pub fn namespaces(&self) -> Vec<String> {
		let mut seen = std::collections::HashSet::new();
		for route in &self.routes {
			if let Some(ns) = &route.namespace {
				seen.insert(ns.clone());
			}
		}
		let mut namespaces: Vec<String> = seen.into_iter().collect();
		namespaces.sort();
		namespaces
	}
}

impl Router for ApiRouter {
	fn add_route(&mut self, route: Route) {
		self.routes.push(route);
	}

	fn mount(
		&mut self,
		prefix: &str,
		routes: Vec<Route>,
		namespace: Option<String>,
	) -> std::result::Result<(), PatternError> {
		for route in routes {
			let mut route = route.prefixed(prefix)?;
			if let Some(ref ns) = namespace {
				route.namespace = Some(ns.clone());
			}
			self.add_route(route);
		}
		Ok(())
	}

	async fn route(&self, mut request: Request) -> Result<Response> {
		let path = request.path().to_string();
		let mut path_matched = false;

		for route in &self.routes {
			let Some(params) = route.pattern().captures(&path) else {
				continue;
			};
			if route.method != request.method {
				path_matched = true;
				continue;
			}

			debug!(
				method = %request.method,
				path = %path,
				route = %route.path,
				"matched route"
			);
			for (key, value) in params {
				request.set_path_param(key, value);
			}
			return route.handler().handle(request).await;
		}

		if path_matched {
			Err(Error::MethodNotAllowed(format!(
				"{} {}",
				request.method, path
			)))
		} else {
			Err(Error::NotFound(format!("No route found for {}", path)))
		}
	}
}

#[async_trait]
impl Handler for ApiRouter {
	async fn handle(&self, request: Request) -> Result<Response> {
		self.route(request).await
	}
}
