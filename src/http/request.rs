//! Request identification.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) when the client sent none
//! - Expose the ID to handlers so it can be logged and forwarded upstream
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - A client-supplied `x-request-id` is kept as-is

use axum::http::{HeaderMap, HeaderName, Request};
use tower_http::request_id::{MakeRequestId, RequestId};

/// Header carrying the request ID, inbound, outbound and upstream.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// The request ID set on `headers`, if it is valid UTF-8.
pub fn request_id(headers: &HeaderMap) -> Option<&str> {
    headers.get(X_REQUEST_ID).and_then(|v| v.to_str().ok())
}
