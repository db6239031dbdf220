//! Route definition.

use async_trait::async_trait;
use hyper::Method;
use std::sync::Arc;
use trellis_http::{Handler, Request, Response};

use crate::pattern::{PatternError, RoutePattern};

/// A single registered route: an HTTP method, a compiled pattern, and the
/// handler that answers matching requests.
#[derive(Clone)]
pub struct Route {
	/// The pattern text as registered (before any mount prefix)
	pub path: String,
	pub method: Method,
	pattern: RoutePattern,
	handler: Arc<dyn Handler>,
	pub name: Option<String>,
	/// Namespace for this route, typically the API version ("v1")
	pub namespace: Option<String>,
}

impl Route {
	/// Create a route from an already-shared handler.
	///
	/// # Errors
	///
	/// Returns a [`PatternError`] when the path does not compile.
	pub fn new(
		method: Method,
		path: impl Into<String>,
		handler: Arc<dyn Handler>,
	) -> Result<Self, PatternError> {
		let path = path.into();
		let pattern = RoutePattern::new(&path)?;
		Ok(Self {
			path,
			method,
			pattern,
			handler,
			name: None,
			namespace: None,
		})
	}

	/// Create a route from a concrete handler, wrapping it in `Arc`.
	pub fn from_handler<H>(
		method: Method,
		path: impl Into<String>,
		handler: H,
	) -> Result<Self, PatternError>
	where
		H: Handler + 'static,
	{
		Self::new(method, path, Arc::new(handler))
	}

	/// Create a route from an async function.
	///
	/// # Examples
	///
	/// ```
	/// use trellis_urls::Route;
	/// use trellis_http::{Request, Response};
	/// use hyper::Method;
	///
	/// async fn show(req: Request) -> trellis_core::Result<Response> {
	///     Response::ok().with_json(&req.params())
	/// }
	///
	/// let route = Route::from_fn(Method::GET, "users/:id(.:format)", show).unwrap();
	/// assert_eq!(route.path, "users/:id(.:format)");
	/// ```
	pub fn from_fn<F, Fut>(
		method: Method,
		path: impl Into<String>,
		func: F,
	) -> Result<Self, PatternError>
	where
		F: Fn(Request) -> Fut + Send + Sync + 'static,
		Fut: std::future::Future<Output = trellis_core::Result<Response>> + Send + 'static,
	{
		Self::from_handler(method, path, FunctionHandler { func })
	}

	/// Set the route name.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}

	/// Set the route namespace.
	pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
		self.namespace = Some(namespace.into());
		self
	}

	/// Full name including namespace (e.g. "v1:user-detail").
	pub fn full_name(&self) -> Option<String> {
		match (&self.namespace, &self.name) {
			(Some(ns), Some(name)) => Some(format!("{}:{}", ns, name)),
			(None, Some(name)) => Some(name.clone()),
			_ => None,
		}
	}

	/// The compiled pattern.
	pub fn pattern(&self) -> &RoutePattern {
		&self.pattern
	}

	/// Rebuild this route under a mount prefix.
	///
	/// # Errors
	///
	/// Returns a [`PatternError`] when the prefixed path does not compile.
	pub(crate) fn prefixed(mut self, prefix: &str) -> Result<Self, PatternError> {
		let prefix = prefix.trim_end_matches('/');
		let prefix = if prefix.starts_with('/') || prefix.is_empty() {
			prefix.to_string()
		} else {
			format!("/{prefix}")
		};
		let suffix = if self.path.starts_with('/') {
			self.path.clone()
		} else {
			format!("/{}", self.path)
		};

		self.path = format!("{prefix}{suffix}");
		self.pattern = RoutePattern::new(&self.path)?;
		Ok(self)
	}

	/// The route's handler.
	pub fn handler(&self) -> &dyn Handler {
		&*self.handler
	}

	/// A cloned `Arc` of the handler, for callers that need ownership.
	pub fn handler_arc(&self) -> Arc<dyn Handler> {
		Arc::clone(&self.handler)
	}
}

/// Adapter that lets a plain async function act as a [`Handler`].
pub struct FunctionHandler<F> {
	pub func: F,
}

#[async_trait]
impl<F, Fut> Handler for FunctionHandler<F>
where
	F: Fn(Request) -> Fut + Send + Sync,
	Fut: std::future::Future<Output = trellis_core::Result<Response>> + Send,
{
	async fn handle(&self, request: Request) -> trellis_core::Result<Response> {
		(self.func)(request).await
	}
}
