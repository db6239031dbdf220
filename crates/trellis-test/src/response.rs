//! Test response wrapper with inspection helpers.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use trellis_http::Response;

/// A response captured by the test client.
#[derive(Debug)]
pub struct TestResponse {
	status: StatusCode,
	headers: HeaderMap,
	body: Bytes,
}

impl TestResponse {
	/// Response status.
	pub fn status(&self) -> StatusCode {
		self.status
	}

	/// Response status code as u16.
	pub fn status_code(&self) -> u16 {
		self.status.as_u16()
	}

	/// Response headers.
	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	/// A single header value, if present and valid UTF-8.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|v| v.to_str().ok())
	}

	/// Raw response body.
	pub fn body(&self) -> &Bytes {
		&self.body
	}

	/// Response body as text (lossy UTF-8).
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).to_string()
	}

	/// Deserialize the body as JSON.
	pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
		serde_json::from_slice(&self.body)
	}

	/// The body as a JSON value, panicking on malformed JSON.
	///
	/// Convenience for assertions; use [`json`](Self::json) when the body
	/// may not be JSON.
	pub fn json_value(&self) -> Value {
		serde_json::from_slice(&self.body).unwrap_or_else(|e| {
			panic!("response body is not valid JSON: {e}: {:?}", self.text())
		})
	}
}

impl From<Response> for TestResponse {
	fn from(response: Response) -> Self {
		Self {
			status: response.status,
			headers: response.headers,
			body: response.body,
		}
	}
}
