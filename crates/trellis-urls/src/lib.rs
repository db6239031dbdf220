//! URL routing for the trellis framework.
//!
//! Route paths use Rails-style syntax: `:name` captures a path segment, and
//! parenthesized groups are optional, so `users/:id(.:format)` matches both
//! `/users/1` and `/users/1.json`, capturing `format` only in the second
//! case. Patterns compile once, at registration, to anchored regexes.

pub mod pattern;
pub mod route;
pub mod router;

pub use pattern::{PatternError, RoutePattern};
pub use route::{FunctionHandler, Route};
pub use router::{ApiRouter, Router};
