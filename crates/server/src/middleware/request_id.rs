//! Request ID middleware for request tracing and correlation.
//!
//! The router sits behind a proxy that usually stamps `x-request-id`. When
//! it does, the router keeps that value so a single ID follows the request
//! from the edge into our logs. Otherwise a UUID v4 is generated.
//!
//! Upstream IDs are accepted only if they are short, visible ASCII. Anything
//! else is replaced, because the value ends up in log fields, Sentry tags and
//! a response header.
//!
//! The chosen ID is:
//! - recorded on the request span (the `request_id` field declared by the
//!   `TraceLayer` in `lib.rs`)
//! - set as a Sentry tag on the current scope
//! - echoed back in the response headers

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream request ID that is kept as-is.
pub const MAX_REQUEST_ID_LEN: usize = 128;

/// Returns the upstream ID if it is usable for correlation.
fn upstream_request_id(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|id| {
            !id.is_empty()
                && id.len() <= MAX_REQUEST_ID_LEN
                && id.bytes().all(|b| b.is_ascii_graphic())
        })
}

/// Middleware that ensures every request carries a request ID.
///
/// Must run inside the `TraceLayer` span, otherwise the `request_id` field
/// has nothing to attach to.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = upstream_request_id(&request)
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    Span::current().record("request_id", &request_id);
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
