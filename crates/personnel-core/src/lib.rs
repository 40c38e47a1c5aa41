//! HTTP plumbing shared by personnel registry services.
//!
//! Error envelope, request locale, middleware stack, tracing, timestamp
//! serialization and environment configuration.

pub mod config;
pub mod error;
pub mod locale;
pub mod middleware;
pub mod serde;
pub mod tracing;
