//! In-process test client for trellis applications.
//!
//! The client drives a [`Handler`](trellis_http::Handler) directly, without
//! opening a socket, so tests exercise routing, parameter extraction, and
//! handler logic exactly as a served request would.

pub mod client;
pub mod response;

pub use client::{ClientError, ClientResult, TestClient, TestRequestBuilder};
pub use response::TestResponse;
