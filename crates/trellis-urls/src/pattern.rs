//! Route pattern compilation and matching.

use percent_encoding::percent_decode_str;
use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while compiling a route pattern.
#[derive(Debug, Error)]
pub enum PatternError {
	#[error("unbalanced optional group in pattern {0:?}")]
	UnbalancedGroup(String),

	#[error("empty capture name in pattern {0:?}")]
	EmptyCaptureName(String),

	#[error("pattern {pattern:?} compiled to an invalid regex: {source}")]
	Regex {
		pattern: String,
		#[source]
		source: Box<regex::Error>,
	},
}

/// A compiled route pattern.
///
/// Syntax:
/// - `:name` captures one path segment. Captures match `[^/.]+`, so a
///   declared format suffix is never swallowed by the capture before it.
/// - `(...)` makes the enclosed part optional; groups may nest. The common
///   case is the trailing `(.:format)` suffix.
/// - everything else matches literally.
///
/// Patterns are anchored to the whole path and normalized to a leading `/`.
#[derive(Debug, Clone)]
pub struct RoutePattern {
	raw: String,
	regex: Regex,
	capture_names: Vec<String>,
}

impl RoutePattern {
	/// Compile a pattern.
	///
	/// # Examples
	///
	/// ```
	/// use trellis_urls::RoutePattern;
	///
	/// let pattern = RoutePattern::new("users/:id(.:format)").unwrap();
	/// assert!(pattern.is_match("/users/1"));
	/// assert!(pattern.is_match("/users/1.json"));
	/// assert!(!pattern.is_match("/users/1/posts"));
	/// ```
	///
	/// # Errors
	///
	/// Returns a [`PatternError`] for unbalanced groups, `:` without a name,
	/// or anything the regex engine rejects (e.g. duplicate capture names).
	pub fn new(pattern: &str) -> Result<Self, PatternError> {
		let raw = if pattern.starts_with('/') {
			pattern.to_string()
		} else {
			format!("/{pattern}")
		};

		let mut source = String::from("^");
		let mut capture_names = Vec::new();
		let mut depth = 0usize;
		let mut chars = raw.chars().peekable();

		while let Some(c) = chars.next() {
			match c {
				':' => {
					let mut name = String::new();
					while let Some(&next) = chars.peek() {
						if next.is_ascii_alphanumeric() || next == '_' {
							name.push(next);
							chars.next();
						} else {
							break;
						}
					}
					if name.is_empty() {
						return Err(PatternError::EmptyCaptureName(raw));
					}
					source.push_str(&format!("(?P<{name}>[^/.]+)"));
					capture_names.push(name);
				}
				'(' => {
					depth += 1;
					source.push_str("(?:");
				}
				')' => {
					if depth == 0 {
						return Err(PatternError::UnbalancedGroup(raw));
					}
					depth -= 1;
					source.push_str(")?");
				}
				other => source.push_str(&regex::escape(&other.to_string())),
			}
		}

		if depth != 0 {
			return Err(PatternError::UnbalancedGroup(raw));
		}
		source.push('$');

		let regex = Regex::new(&source).map_err(|e| PatternError::Regex {
			pattern: raw.clone(),
			source: Box::new(e),
		})?;

		Ok(Self {
			raw,
			regex,
			capture_names,
		})
	}

	/// The normalized pattern text.
	pub fn raw(&self) -> &str {
		&self.raw
	}

	/// Names of the pattern's captures, in order of appearance.
	pub fn capture_names(&self) -> &[String] {
		&self.capture_names
	}

	/// Whether the pattern matches the whole path.
	pub fn is_match(&self, path: &str) -> bool {
		self.regex.is_match(path)
	}

	/// Match the path and extract captured variables, percent-decoded.
	///
	/// Optional captures that did not participate contribute no key.
	///
	/// # Examples
	///
	/// ```
	/// use trellis_urls::RoutePattern;
	///
	/// let pattern = RoutePattern::new("users/:id(.:format)").unwrap();
	///
	/// let params = pattern.captures("/users/1.json").unwrap();
	/// assert_eq!(params["id"], "1");
	/// assert_eq!(params["format"], "json");
	///
	/// let params = pattern.captures("/users/1").unwrap();
	/// assert_eq!(params.get("format"), None);
	/// ```
	pub fn captures(&self, path: &str) -> Option<HashMap<String, String>> {
		let caps = self.regex.captures(path)?;
		let mut params = HashMap::new();
		for name in &self.capture_names {
			if let Some(matched) = caps.name(name) {
				let decoded = percent_decode_str(matched.as_str())
					.decode_utf8_lossy()
					.to_string();
				params.insert(name.clone(), decoded);
			}
		}
		Some(params)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[test]
	fn test_optional_format_captured_when_present() {
		let pattern = RoutePattern::new("users/:id(.:format)").unwrap();

		let params = pattern.captures("/users/1.json").unwrap();
		assert_eq!(params["id"], "1");
		assert_eq!(params["format"], "json");
	}

	#[test]
	fn test_optional_format_absent() {
		let pattern = RoutePattern::new("users/:id(.:format)").unwrap();

		let params = pattern.captures("/users/1").unwrap();
		assert_eq!(params["id"], "1");
		assert!(!params.contains_key("format"));
	}

	#[test]
	fn test_capture_does_not_swallow_declared_format() {
		// ":id" must stop at the dot so "(.:format)" can claim it
		let pattern = RoutePattern::new("users/:id(.:format)").unwrap();

		let params = pattern.captures("/users/42.xml").unwrap();
		assert_eq!(params["id"], "42");
		assert_eq!(params["format"], "xml");
	}

	#[rstest]
	#[case("/users/1/posts")]
	#[case("/users/")]
	#[case("/users/1.json/extra")]
	#[case("/accounts/1")]
	fn test_non_matching_paths(#[case] path: &str) {
		let pattern = RoutePattern::new("users/:id(.:format)").unwrap();
		assert!(pattern.captures(path).is_none());
	}

	#[test]
	fn test_literal_pattern() {
		let pattern = RoutePattern::new("users").unwrap();

		assert!(pattern.is_match("/users"));
		assert!(!pattern.is_match("/users/1"));
		assert!(pattern.captures("/users").unwrap().is_empty());
	}

	#[test]
	fn test_leading_slash_normalization() {
		let bare = RoutePattern::new("users/:id").unwrap();
		let slashed = RoutePattern::new("/users/:id").unwrap();

		assert_eq!(bare.raw(), slashed.raw());
		assert!(bare.is_match("/users/1"));
	}

	#[test]
	fn test_captures_are_percent_decoded() {
		let pattern = RoutePattern::new("users/:name").unwrap();

		let params = pattern.captures("/users/John%20Doe").unwrap();
		assert_eq!(params["name"], "John Doe");
	}

	#[test]
	fn test_multiple_captures() {
		let pattern = RoutePattern::new("users/:user_id/posts/:id").unwrap();

		let params = pattern.captures("/users/7/posts/9").unwrap();
		assert_eq!(params["user_id"], "7");
		assert_eq!(params["id"], "9");
		assert_eq!(pattern.capture_names(), ["user_id", "id"]);
	}

	#[rstest]
	#[case("users/(:id")]
	#[case("users/:id)")]
	fn test_unbalanced_groups_rejected(#[case] pattern: &str) {
		assert!(matches!(
			RoutePattern::new(pattern),
			Err(PatternError::UnbalancedGroup(_))
		));
	}

	#[test]
	fn test_empty_capture_name_rejected() {
		assert!(matches!(
			RoutePattern::new("users/:"),
			Err(PatternError::EmptyCaptureName(_))
		));
	}

	#[test]
	fn test_duplicate_capture_name_rejected() {
		assert!(matches!(
			RoutePattern::new("users/:id/posts/:id"),
			Err(PatternError::Regex { .. })
		));
	}
}
