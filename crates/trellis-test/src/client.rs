//! The in-process test client.

use bytes::Bytes;
use hyper::Method;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use trellis_http::{Handler, PreparsedParams, Request, Response};

use crate::response::TestResponse;

#[derive(Debug, Error)]
pub enum ClientError {
	#[error("invalid request: {0}")]
	InvalidRequest(#[from] trellis_core::Error),

	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("form encoding error: {0}")]
	FormEncoding(#[from] serde_urlencoded::ser::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Drives a [`Handler`] without a server.
///
/// Handler errors are rendered into responses the way a server front-end
/// would, so a missed route shows up as a 404 response rather than an `Err`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use hyper::Method;
/// use trellis_http::{Request, Response};
/// use trellis_test::TestClient;
/// use trellis_urls::{ApiRouter, Route, Router};
///
/// # tokio_test::block_on(async {
/// let mut router = ApiRouter::new();
/// router.add_route(
///     Route::from_fn(Method::GET, "ping", |_req: Request| async {
///         Ok(Response::ok().with_body("pong"))
///     })
///     .unwrap(),
/// );
///
/// let client = TestClient::new(router);
/// let response = client.get("/ping").await.unwrap();
/// assert_eq!(response.text(), "pong");
/// # });
/// ```
pub struct TestClient {
	handler: Arc<dyn Handler>,
}

impl TestClient {
	/// Create a client around a concrete handler.
	pub fn new<H: Handler + 'static>(handler: H) -> Self {
		Self {
			handler: Arc::new(handler),
		}
	}

	/// Create a client around an already-shared handler.
	pub fn from_arc(handler: Arc<dyn Handler>) -> Self {
		Self { handler }
	}

	/// Start building a request with an arbitrary method.
	pub fn request(&self, method: Method, uri: &str) -> TestRequestBuilder {
		TestRequestBuilder {
			handler: Arc::clone(&self.handler),
			builder: Request::builder().method(method).uri(uri),
		}
	}

	/// Perform a GET request.
	pub async fn get(&self, uri: &str) -> ClientResult<TestResponse> {
		self.request(Method::GET, uri).send().await
	}

	/// Perform a DELETE request.
	pub async fn delete(&self, uri: &str) -> ClientResult<TestResponse> {
		self.request(Method::DELETE, uri).send().await
	}

	/// POST a form-urlencoded body.
	pub async fn post_form<T: Serialize + ?Sized>(
		&self,
		uri: &str,
		form: &T,
	) -> ClientResult<TestResponse> {
		self.request(Method::POST, uri).form(form)?.send().await
	}

	/// POST a JSON body.
	pub async fn post_json<T: Serialize + ?Sized>(
		&self,
		uri: &str,
		json: &T,
	) -> ClientResult<TestResponse> {
		self.request(Method::POST, uri).json(json)?.send().await
	}
}

/// Builds a single test request.
pub struct TestRequestBuilder {
	handler: Arc<dyn Handler>,
	builder: trellis_http::RequestBuilder,
}

impl TestRequestBuilder {
	/// Add a header.
	pub fn header(mut self, name: &str, value: &str) -> Self {
		self.builder = self.builder.header(name, value);
		self
	}

	/// Set a raw body.
	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.builder = self.builder.body(body.into());
		self
	}

	/// Set a form-urlencoded body with the matching content type.
	pub fn form<T: Serialize + ?Sized>(self, form: &T) -> ClientResult<Self> {
		let encoded = serde_urlencoded::to_string(form)?;
		Ok(self
			.header("content-type", "application/x-www-form-urlencoded")
			.body(encoded))
	}

	/// Set a JSON body with the matching content type.
	pub fn json<T: Serialize + ?Sized>(self, json: &T) -> ClientResult<Self> {
		let encoded = serde_json::to_vec(json)?;
		Ok(self.header("content-type", "application/json").body(encoded))
	}

	/// Attach pre-parsed body parameters to the request extensions.
	///
	/// Mirrors front-ends that parse the body upstream and hand the result
	/// down instead of the raw bytes.
	pub fn preparsed(mut self, params: PreparsedParams) -> Self {
		self.builder = self.builder.extension(params);
		self
	}

	/// Send the request and capture the response.
	pub async fn send(self) -> ClientResult<TestResponse> {
		let request = self.builder.build()?;

		let response = match self.handler.handle(request).await {
			Ok(response) => response,
			Err(error) => Response::from(error),
		};
		Ok(TestResponse::from(response))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use trellis_urls::{ApiRouter, Route, Router};

	fn params_app() -> ApiRouter {
		let mut router = ApiRouter::new();
		router
			.mount(
				"/v1",
				vec![
					Route::from_fn(Method::GET, "users/:id(.:format)", |req: Request| async move {
						Response::ok().with_json(&req.params())
					})
					.unwrap(),
					Route::from_fn(Method::POST, "users", |req: Request| async move {
						Response::created().with_json(&req.params())
					})
					.unwrap(),
				],
				Some("v1".to_string()),
			)
			.unwrap();
		router
	}

	#[rstest]
	#[tokio::test]
	async fn test_get_extracts_path_captures() {
		let client = TestClient::new(params_app());
		let response = client.get("/v1/users/1.json").await.unwrap();

		assert_eq!(response.status_code(), 200);
		let params = response.json_value();
		assert_eq!(params["id"], "1");
		assert_eq!(params["format"], "json");
	}

	#[rstest]
	#[tokio::test]
	async fn test_post_form_reaches_handler_params() {
		let client = TestClient::new(params_app());
		let response = client
			.post_form("/v1/users", &[("name", "John Doe")])
			.await
			.unwrap();

		assert_eq!(response.status_code(), 201);
		assert_eq!(response.json_value()["name"], "John Doe");
	}

	#[rstest]
	#[tokio::test]
	async fn test_handler_errors_render_as_responses() {
		let client = TestClient::new(params_app());
		let response = client.get("/v1/missing/route/entirely").await.unwrap();

		assert_eq!(response.status_code(), 404);
	}

	#[rstest]
	#[tokio::test]
	async fn test_unparseable_uri_is_a_client_error() {
		let client = TestClient::new(params_app());
		let error = client.get("").await.unwrap_err();

		assert!(matches!(
			error,
			ClientError::InvalidRequest(trellis_core::Error::BadRequest(_))
		));
	}

	#[rstest]
	#[tokio::test]
	async fn test_preparsed_params_are_attached() {
		let client = TestClient::new(params_app());
		let mut map = serde_json::Map::new();
		map.insert("name".to_string(), "John Doe".into());

		let response = client
			.request(Method::POST, "/v1/users")
			.preparsed(PreparsedParams::new(map))
			.send()
			.await
			.unwrap();

		assert_eq!(response.json_value()["name"], "John Doe");
	}
}
