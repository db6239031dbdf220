//! HTTP request representation.

mod params;

use bytes::Bytes;
use hyper::{HeaderMap, Method, Uri, Version};
use std::collections::HashMap;
use trellis_core::exception::{Error, Result};

use crate::Extensions;

/// HTTP Request representation.
///
/// Carries the raw request data plus the two routing byproducts the
/// framework fills in before a handler runs: `query_params` (parsed from the
/// URI at build time, stored undecoded) and `path_params` (set by the router
/// from the matched pattern's captures).
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	/// Variables captured from the matched route pattern
	pub path_params: HashMap<String, String>,
	/// Raw query pairs parsed from the URI
	pub query_params: HashMap<String, String>,
	/// Typed per-request storage
	pub extensions: Extensions,
}

impl Request {
	/// Start building a request.
	///
	/// # Examples
	///
	/// ```
	/// use trellis_http::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::GET)
	///     .uri("/v1/users/1?include=articles")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.path(), "/v1/users/1");
	/// assert_eq!(request.query_params.get("include"), Some(&"articles".to_string()));
	/// ```
	pub fn builder() -> RequestBuilder {
		RequestBuilder::new()
	}

	/// The request path, without the query string.
	pub fn path(&self) -> &str {
		self.uri.path()
	}
}

/// Builder for [`Request`].
pub struct RequestBuilder {
	method: Method,
	uri: Option<String>,
	version: Version,
	headers: HeaderMap,
	body: Bytes,
	extensions: Extensions,
}

impl RequestBuilder {
	fn new() -> Self {
		Self {
			method: Method::GET,
			uri: None,
			version: Version::HTTP_11,
			headers: HeaderMap::new(),
			body: Bytes::new(),
			extensions: Extensions::new(),
		}
	}

	/// Set the HTTP method (defaults to GET).
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	/// Set the request URI. Required.
	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = Some(uri.into());
		self
	}

	/// Set the HTTP version (defaults to HTTP/1.1).
	pub fn version(mut self, version: Version) -> Self {
		self.version = version;
		self
	}

	/// Replace the header map.
	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	/// Add a single header. Invalid names or values are ignored.
	pub fn header(mut self, name: &str, value: &str) -> Self {
		if let Ok(header_name) = hyper::header::HeaderName::from_bytes(name.as_bytes())
			&& let Ok(header_value) = hyper::header::HeaderValue::from_str(value)
		{
			self.headers.insert(header_name, header_value);
		}
		self
	}

	/// Set the request body.
	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Insert a typed value into the request extensions.
	pub fn extension<T: Send + Sync + 'static>(self, value: T) -> Self {
		self.extensions.insert(value);
		self
	}

	/// Build the request, parsing the URI and its query string.
	///
	/// # Errors
	///
	/// Returns [`Error::BadRequest`] when the URI is missing or unparseable.
	pub fn build(self) -> Result<Request> {
		let raw_uri = self
			.uri
			.ok_or_else(|| Error::BadRequest("request URI is required".to_string()))?;
		let uri: Uri = raw_uri
			.parse()
			.map_err(|e| Error::BadRequest(format!("invalid request URI {raw_uri:?}: {e}")))?;

		let query_params = Request::parse_query_params(&uri);

		Ok(Request {
			method: self.method,
			uri,
			version: self.version,
			headers: self.headers,
			body: self.body,
			path_params: HashMap::new(),
			query_params,
			extensions: self.extensions,
		})
	}
}
