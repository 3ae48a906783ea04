//! API Exposure modules for different protocols
//!
//! Each exposure type consumes a `ServerHost` and produces a Router for that
//! protocol. REST is the only one the dashboard serves.

pub mod rest;

pub use rest::RestExposure;
