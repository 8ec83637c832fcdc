//! Response runner: write a [`Reply`] onto the wire representation.
//!
//! Runs at most once per request (the seal guarantees exactly one reply
//! per invocation). Status first, then headers, then the serialized
//! body. A content type is inferred from the body shape unless the reply
//! carries an explicit one; explicit headers always win.

use axum::body::Body;
use axum::response::Response;
use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use quiver_core::{Reply, ReplyBody};

/// Convert a reply into the framework response.
#[must_use]
pub fn run_response(reply: Reply) -> Response {
    let (status, headers, body) = reply.into_parts();

    let (inferred_type, bytes) = match body {
        None => (None, Bytes::new()),
        Some(ReplyBody::Json(value)) => match serde_json::to_vec(&value) {
            Ok(buffer) => (
                Some(HeaderValue::from_static("application/json")),
                Bytes::from(buffer),
            ),
            Err(error) => {
                tracing::error!(error = %error, "reply body failed to serialize");
                return plain(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "reply serialization failed",
                );
            },
        },
        Some(ReplyBody::Text(text)) => (
            Some(HeaderValue::from_static("text/plain; charset=utf-8")),
            Bytes::from(text),
        ),
        // Raw bytes: the caller says what they are, or nothing.
        Some(ReplyBody::Bytes(bytes)) => (None, bytes),
    };

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    if let Some(content_type) = inferred_type {
        response.headers_mut().insert(CONTENT_TYPE, content_type);
    }
    // Explicit reply headers override anything inferred above.
    for (name, value) in &headers {
        response.headers_mut().insert(name, value.clone());
    }
    response
}

fn plain(status: StatusCode, message: &'static str) -> Response {
    let mut response = Response::new(Body::from(message));
    *response.status_mut() = status;
    response
}
