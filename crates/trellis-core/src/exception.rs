//! Framework error taxonomy.
//!
//! Handlers and middleware return [`Result<Response>`](Result); any error
//! that escapes the chain is rendered as a JSON error body with the status
//! code reported by [`Error::status_code`].

use thiserror::Error as ThisError;

/// Result alias used across the framework.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while dispatching a request.
#[derive(Debug, ThisError)]
pub enum Error {
	/// No registered route pattern matched the request path.
	#[error("Not found: {0}")]
	NotFound(String),

	/// A route pattern matched the path, but not the request method.
	#[error("Method not allowed: {0}")]
	MethodNotAllowed(String),

	/// The request could not be interpreted (bad pattern, bad URI).
	#[error("Bad request: {0}")]
	BadRequest(String),

	/// A response body could not be serialized.
	#[error("Serialization error: {0}")]
	Serialization(String),

	/// Generic HTTP-level failure.
	#[error("HTTP error: {0}")]
	Http(String),

	/// Anything that should surface as a 500.
	#[error("Internal error: {0}")]
	Internal(String),
}

impl Error {
	/// HTTP status code this error renders as.
	///
	/// # Examples
	///
	/// ```
	/// use trellis_core::Error;
	///
	/// assert_eq!(Error::NotFound("/missing".into()).status_code(), 404);
	/// assert_eq!(Error::MethodNotAllowed("PUT /users".into()).status_code(), 405);
	/// ```
	pub fn status_code(&self) -> u16 {
		match self {
			Error::NotFound(_) => 404,
			Error::MethodNotAllowed(_) => 405,
			Error::BadRequest(_) => 400,
			Error::Serialization(_) | Error::Http(_) | Error::Internal(_) => 500,
		}
	}
}
