//! Infrastructure inventory library crate
//!
//! Exposes the HTTP service, its configuration and the ingestion/export
//! helpers so integration tests can drive the router directly.

pub mod server;
