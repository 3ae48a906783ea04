//! Server module for building the dashboard HTTP server
//!
//! This module provides a `ServerBuilder` that assembles a record store,
//! configuration and sort table into a `ServerHost`, then exposes it over
//! REST.

pub mod builder;
pub mod exposure;
pub mod host;

pub use builder::ServerBuilder;
pub use exposure::RestExposure;
pub use host::ServerHost;
