//! Core types shared by every trellis crate.
//!
//! Currently this is the error taxonomy: a single [`exception::Error`] enum
//! that maps onto HTTP status codes, and the [`exception::Result`] alias used
//! by handlers and middleware throughout the framework.

pub mod exception;

pub use exception::{Error, Result};
