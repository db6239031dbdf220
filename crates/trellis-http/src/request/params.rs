use super::Request;
use hyper::Uri;
use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::params::{self, PreparsedParams};

impl Request {
	/// Parse query parameters from a URI.
	pub(super) fn parse_query_params(uri: &Uri) -> HashMap<String, String> {
		uri.query()
			.map(|q| {
				q.split('&')
					.filter_map(|pair| {
						// Split on first '=' only to preserve '=' in values
						let mut parts = pair.splitn(2, '=');
						Some((
							parts.next()?.to_string(),
							parts.next().unwrap_or("").to_string(),
						))
					})
					.collect()
			})
			.unwrap_or_default()
	}

	/// Get URL-decoded query parameters.
	///
	/// `query_params` keeps pairs exactly as they appeared in the URI; this
	/// returns a copy with keys and values decoded. Query strings use form
	/// encoding, so `+` means space and a literal plus arrives as `%2B`.
	pub fn decoded_query_params(&self) -> HashMap<String, String> {
		self.query_params
			.iter()
			.map(|(k, v)| (decode_query_component(k), decode_query_component(v)))
			.collect()
	}

	/// Set a path parameter (called by the router with pattern captures).
	pub fn set_path_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.path_params.insert(key.into(), value.into());
	}

	/// Body parameters for this request.
	///
	/// Parses the native body according to its Content-Type. When that
	/// yields nothing (no body, or a body no parser claims) falls back to
	/// the [`PreparsedParams`] extension slot, used verbatim.
	pub fn body_params(&self) -> Option<Map<String, Value>> {
		let content_type = self
			.headers
			.get(hyper::header::CONTENT_TYPE)
			.and_then(|h| h.to_str().ok());

		match params::parse_body(content_type, &self.body) {
			Some(map) if !map.is_empty() => Some(map),
			_ => self.extensions.get::<PreparsedParams>().map(|p| p.0),
		}
	}

	/// The merged parameter mapping for this request.
	///
	/// Path captures, decoded query pairs, and body parameters combined with
	/// the precedence routing < query < body. Pure: calling this twice on
	/// the same request yields the same mapping.
	///
	/// # Examples
	///
	/// ```
	/// use trellis_http::Request;
	/// use hyper::Method;
	///
	/// let mut request = Request::builder()
	///     .method(Method::GET)
	///     .uri("/v1/users/1?include=articles")
	///     .build()
	///     .unwrap();
	/// request.set_path_param("id", "1");
	///
	/// let params = request.params();
	/// assert_eq!(params["id"], "1");
	/// assert_eq!(params["include"], "articles");
	/// ```
	pub fn params(&self) -> Map<String, Value> {
		let query = self.decoded_query_params();
		let body = self.body_params();
		params::aggregate(&self.path_params, &query, body.as_ref())
	}
}

// '+' decodes to space before percent-decoding, so %2B stays a plus
fn decode_query_component(raw: &str) -> String {
	let unplussed = raw.replace('+', " ");
	percent_decode_str(&unplussed).decode_utf8_lossy().to_string()
}

#[cfg(test)]
mod tests {
	use super::*;
	use hyper::Method;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case("/test?token=abc==", "token", "abc==")]
	#[case("/test?key=value", "key", "value")]
	#[case("/test?formula=a=b=c", "formula", "a=b=c")]
	#[case("/test?key=", "key", "")]
	fn test_parse_query_params(#[case] uri: &str, #[case] key: &str, #[case] expected: &str) {
		let uri: Uri = uri.parse().unwrap();
		let params = Request::parse_query_params(&uri);
		assert_eq!(params.get(key), Some(&expected.to_string()));
	}

	#[test]
	fn test_parse_query_params_no_query_string() {
		let uri: Uri = "/test".parse().unwrap();
		assert!(Request::parse_query_params(&uri).is_empty());
	}

	#[rstest]
	#[case("/test?name=John%20Doe", "name", "John Doe")]
	#[case("/test?name=John+Doe", "name", "John Doe")]
	#[case("/test?formula=a%2Bb", "formula", "a+b")]
	fn test_decoded_query_params(#[case] uri: &str, #[case] key: &str, #[case] expected: &str) {
		let request = Request::builder().uri(uri).build().unwrap();

		let decoded = request.decoded_query_params();
		assert_eq!(decoded.get(key), Some(&expected.to_string()));
	}

	#[test]
	fn test_params_merges_path_and_query() {
		let mut request = Request::builder()
			.uri("/v1/users/1?include=articles")
			.build()
			.unwrap();
		request.set_path_param("id", "1");

		let params = request.params();
		assert_eq!(params.len(), 2);
		assert_eq!(params["id"], "1");
		assert_eq!(params["include"], "articles");
	}

	#[test]
	fn test_params_from_form_body() {
		let request = Request::builder()
			.method(Method::POST)
			.uri("/v1/users")
			.header("content-type", "application/x-www-form-urlencoded")
			.body("name=John+Doe")
			.build()
			.unwrap();

		let params = request.params();
		assert_eq!(params.len(), 1);
		assert_eq!(params["name"], "John Doe");
	}

	#[test]
	fn test_params_falls_back_to_preparsed_slot() {
		let request = Request::builder()
			.method(Method::POST)
			.uri("/v1/users")
			.build()
			.unwrap();

		let mut preparsed = Map::new();
		preparsed.insert("name".to_string(), json!("John Doe"));
		request.extensions.insert(PreparsedParams::new(preparsed));

		let params = request.params();
		assert_eq!(params.len(), 1);
		assert_eq!(params["name"], "John Doe");
	}

	#[test]
	fn test_native_body_wins_over_preparsed_slot() {
		let request = Request::builder()
			.method(Method::POST)
			.uri("/v1/users")
			.body("name=From+Body")
			.build()
			.unwrap();

		let mut preparsed = Map::new();
		preparsed.insert("name".to_string(), json!("From Slot"));
		request.extensions.insert(PreparsedParams::new(preparsed));

		let params = request.params();
		assert_eq!(params["name"], "From Body");
	}

	#[test]
	fn test_params_idempotent() {
		let mut request = Request::builder()
			.uri("/v1/users/1?include=articles")
			.build()
			.unwrap();
		request.set_path_param("id", "1");

		assert_eq!(request.params(), request.params());
	}
}
