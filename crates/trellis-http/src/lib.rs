//! HTTP types for the trellis framework.
//!
//! This crate provides the [`Request`] and [`Response`] types, the
//! [`Handler`]/[`Middleware`] traits, typed per-request [`Extensions`], and
//! the parameter aggregator ([`params`]) that merges path captures, query
//! pairs, and body parameters into the single mapping handlers consume.

pub mod extensions;
pub mod middleware;
pub mod params;
pub mod request;
pub mod response;

pub use extensions::Extensions;
pub use middleware::{Handler, Middleware, MiddlewareChain};
pub use params::PreparsedParams;
pub use request::{Request, RequestBuilder};
pub use response::Response;

pub use trellis_core::exception::{Error, Result};
