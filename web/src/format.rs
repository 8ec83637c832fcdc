//! Default reply formatters.
//!
//! Both produce the `{ "code", "message" }` JSON shape. The error
//! formatter deliberately says nothing about the underlying failure;
//! internals are logged at the seal boundary, never exposed.

use http::StatusCode;
use quiver_core::{NotFound, Reply};
use serde::Serialize;
use serde_json::Value;

/// Client-visible error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    /// Stable code for client-side error handling.
    code: &'static str,
    /// Human-readable message.
    message: String,
}

impl ErrorBody {
    fn into_value(self) -> Value {
        serde_json::to_value(&self).unwrap_or(Value::Null)
    }
}

/// Default 404 reply for an unmatched request.
///
/// The message carries the original method and path for diagnostics.
#[must_use]
pub fn not_found_reply(miss: &NotFound) -> Reply {
    Reply::json(
        StatusCode::NOT_FOUND,
        ErrorBody {
            code: "NOT_FOUND",
            message: miss.to_string(),
        }
        .into_value(),
    )
}

/// Default 500 reply for an unexpected failure.
#[must_use]
pub fn internal_error_reply(_error: &anyhow::Error) -> Reply {
    Reply::json(
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorBody {
            code: "INTERNAL_SERVER_ERROR",
            message: "An internal error occurred".to_string(),
        }
        .into_value(),
    )
}
