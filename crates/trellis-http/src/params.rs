//! Parameter aggregation.
//!
//! Every request carries up to three parameter sources: the variables
//! captured from the matched route pattern, the query string, and the body.
//! [`aggregate`] merges them into the single mapping handlers read, with the
//! precedence routing < query < body: a later source overwrites a
//! same-named key from an earlier one.
//!
//! Host environments that parse the body before dispatch (a Rails-style
//! middleware stack, a test harness) can hand the result over through the
//! [`PreparsedParams`] extension slot instead; it is consumed only when
//! native body parsing contributes nothing, and it is read out explicitly by
//! [`Request::body_params`](crate::Request::body_params) before aggregation
//! so the merge itself stays a pure function.

use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// Body parameters parsed ahead of dispatch by the host environment.
///
/// Stored as a request extension. Used verbatim as the body source when the
/// request carries no parseable body of its own.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PreparsedParams(pub Map<String, Value>);

impl PreparsedParams {
	/// Wrap an already-parsed parameter mapping.
	pub fn new(params: Map<String, Value>) -> Self {
		Self(params)
	}
}

impl From<Map<String, Value>> for PreparsedParams {
	fn from(params: Map<String, Value>) -> Self {
		Self(params)
	}
}

/// Merge the three parameter sources into one flat mapping.
///
/// Values are taken as received, without coercion or validation. Absent
/// sources contribute no keys. The function has no hidden state: the same
/// inputs always produce the same mapping.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use trellis_http::params::aggregate;
///
/// let mut path = HashMap::new();
/// path.insert("id".to_string(), "1".to_string());
/// let mut query = HashMap::new();
/// query.insert("include".to_string(), "articles".to_string());
///
/// let merged = aggregate(&path, &query, None);
/// assert_eq!(merged["id"], "1");
/// assert_eq!(merged["include"], "articles");
/// ```
pub fn aggregate(
	path_params: &HashMap<String, String>,
	query_params: &HashMap<String, String>,
	body_params: Option<&Map<String, Value>>,
) -> Map<String, Value> {
	let mut merged = Map::new();

	for (key, value) in path_params {
		merged.insert(key.clone(), Value::String(value.clone()));
	}
	for (key, value) in query_params {
		merged.insert(key.clone(), Value::String(value.clone()));
	}
	if let Some(body) = body_params {
		for (key, value) in body {
			merged.insert(key.clone(), value.clone());
		}
	}

	merged
}

/// Parse a request body into a parameter mapping, dispatching on the
/// Content-Type header.
///
/// JSON bodies must be objects; form bodies decode as flat string pairs.
/// Empty, unrecognized, or malformed bodies contribute nothing rather than
/// failing the request.
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Option<Map<String, Value>> {
	if body.is_empty() {
		return None;
	}

	let content_type = content_type.unwrap_or("application/x-www-form-urlencoded");

	if content_type.contains("json") {
		match serde_json::from_slice::<Value>(body) {
			Ok(Value::Object(map)) => Some(map),
			Ok(other) => {
				debug!(%other, "ignoring non-object JSON body");
				None
			}
			Err(error) => {
				debug!(%error, "ignoring malformed JSON body");
				None
			}
		}
	} else if content_type.contains("x-www-form-urlencoded") {
		match serde_urlencoded::from_bytes::<Vec<(String, String)>>(body) {
			Ok(pairs) => Some(
				pairs
					.into_iter()
					.map(|(key, value)| (key, Value::String(value)))
					.collect(),
			),
			Err(error) => {
				debug!(%error, "ignoring malformed form body");
				None
			}
		}
	} else {
		debug!(content_type, "no body parser for content type");
		None
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn string_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	#[test]
	fn test_aggregate_path_only() {
		let path = string_map(&[("id", "1"), ("format", "json")]);
		let merged = aggregate(&path, &HashMap::new(), None);

		assert_eq!(merged.len(), 2);
		assert_eq!(merged["id"], "1");
		assert_eq!(merged["format"], "json");
	}

	#[test]
	fn test_aggregate_all_sources_present() {
		let path = string_map(&[("id", "1")]);
		let query = string_map(&[("include", "articles")]);
		let mut body = Map::new();
		body.insert("name".to_string(), json!("John Doe"));

		let merged = aggregate(&path, &query, Some(&body));

		assert_eq!(merged.len(), 3);
		assert_eq!(merged["id"], "1");
		assert_eq!(merged["include"], "articles");
		assert_eq!(merged["name"], "John Doe");
	}

	#[test]
	fn test_aggregate_body_overrides_query_overrides_path() {
		let path = string_map(&[("id", "from-path"), ("only", "path")]);
		let query = string_map(&[("id", "from-query")]);
		let mut body = Map::new();
		body.insert("id".to_string(), json!("from-body"));

		let merged = aggregate(&path, &query, Some(&body));

		assert_eq!(merged["id"], "from-body");
		assert_eq!(merged["only"], "path");

		let without_body = aggregate(&path, &query, None);
		assert_eq!(without_body["id"], "from-query");
	}

	#[test]
	fn test_aggregate_is_idempotent() {
		let path = string_map(&[("id", "1")]);
		let query = string_map(&[("include", "articles")]);
		let mut body = Map::new();
		body.insert("name".to_string(), json!("John Doe"));

		let first = aggregate(&path, &query, Some(&body));
		let second = aggregate(&path, &query, Some(&body));

		assert_eq!(first, second);
	}

	#[test]
	fn test_aggregate_absent_sources_contribute_nothing() {
		let merged = aggregate(&HashMap::new(), &HashMap::new(), None);
		assert!(merged.is_empty());
	}

	#[rstest]
	#[case(Some("application/x-www-form-urlencoded"))]
	#[case(None)]
	fn test_parse_body_form(#[case] content_type: Option<&str>) {
		let body = parse_body(content_type, b"name=John+Doe&role=admin").unwrap();

		assert_eq!(body["name"], "John Doe");
		assert_eq!(body["role"], "admin");
	}

	#[test]
	fn test_parse_body_json_object() {
		let body = parse_body(Some("application/json"), br#"{"name": "John Doe"}"#).unwrap();
		assert_eq!(body["name"], "John Doe");
	}

	#[test]
	fn test_parse_body_json_preserves_nested_values() {
		let raw = br#"{"user": {"name": "John Doe", "tags": ["a", "b"]}}"#;
		let body = parse_body(Some("application/json"), raw).unwrap();

		assert_eq!(body["user"]["name"], "John Doe");
		assert_eq!(body["user"]["tags"], json!(["a", "b"]));
	}

	#[rstest]
	#[case(Some("application/json"), br#"["not", "an", "object"]"#.as_slice())]
	#[case(Some("application/json"), b"{not json".as_slice())]
	#[case(Some("application/octet-stream"), b"\x00\x01\x02".as_slice())]
	#[case(Some("application/json"), b"".as_slice())]
	fn test_parse_body_unusable_input_yields_none(
		#[case] content_type: Option<&str>,
		#[case] body: &[u8],
	) {
		assert_eq!(parse_body(content_type, body), None);
	}
}
