//! Test utilities for personnel registry services.
//!
//! Token fixtures and request/response helpers for driving a router with
//! `tower::ServiceExt::oneshot`. Use from `[dev-dependencies]` only.

pub mod auth;
pub mod http;
