//! HTTP surface of both hops

use axum::http::StatusCode;

pub mod gateway;
pub mod orchestrator;

/// Upper bound on inbound bodies; a postal code request is a few bytes
pub const MAX_BODY_BYTES: usize = 16 * 1024;

/// Liveness probe
pub(crate) async fn health() -> &'static str {
    "ok"
}

/// Answer for any method a route does not serve
pub(crate) async fn method_not_allowed() -> (StatusCode, &'static str) {
    (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}
