//! Middleware for the pretest server
//!
//! This module provides middleware for request tracing, security headers,
//! and the admin session extractor.

pub mod auth;
mod security;
mod tracing;

pub use auth::{AdminSession, LOGIN_PATH};
pub use security::{hsts_header, security_headers};
pub use tracing::request_tracing;
