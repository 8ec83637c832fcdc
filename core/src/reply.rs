//! Wire-ready replies and the routing-miss signal.

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method, StatusCode};
use std::fmt;

/// A terminal, wire-ready outcome: status, optional body, headers.
///
/// Replies are immutable once constructed and consumed exactly once by the
/// response runner in `quiver-web`.
///
/// # Examples
///
/// ```
/// use quiver_core::Reply;
/// use http::StatusCode;
/// use serde_json::json;
///
/// let reply = Reply::json(StatusCode::OK, json!({ "id": "42" }));
/// assert_eq!(reply.status(), StatusCode::OK);
/// ```
#[derive(Debug, Clone)]
pub struct Reply {
    status: StatusCode,
    body: Option<ReplyBody>,
    headers: HeaderMap,
}

/// Reply body payload.
#[derive(Debug, Clone)]
pub enum ReplyBody {
    /// A JSON document, serialized by the response runner.
    Json(serde_json::Value),
    /// Plain text.
    Text(String),
    /// Raw bytes; the caller supplies any content type via headers.
    Bytes(Bytes),
}

impl Reply {
    /// A reply with the given status and no body.
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            body: None,
            headers: HeaderMap::new(),
        }
    }

    /// A bare `200 OK`.
    #[must_use]
    pub fn ok() -> Self {
        Self::new(StatusCode::OK)
    }

    /// A bare `201 Created`.
    #[must_use]
    pub fn created() -> Self {
        Self::new(StatusCode::CREATED)
    }

    /// A bare `204 No Content`.
    #[must_use]
    pub fn no_content() -> Self {
        Self::new(StatusCode::NO_CONTENT)
    }

    /// A JSON reply.
    #[must_use]
    pub fn json(status: StatusCode, body: serde_json::Value) -> Self {
        Self {
            status,
            body: Some(ReplyBody::Json(body)),
            headers: HeaderMap::new(),
        }
    }

    /// A plain-text reply.
    #[must_use]
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: Some(ReplyBody::Text(body.into())),
            headers: HeaderMap::new(),
        }
    }

    /// A raw-bytes reply.
    #[must_use]
    pub fn bytes(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: Some(ReplyBody::Bytes(body.into())),
            headers: HeaderMap::new(),
        }
    }

    /// Builder-style header. Explicit headers win over anything the
    /// response runner would infer (e.g. `content-type`).
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// The reply status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// The reply headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The reply body, if any.
    #[must_use]
    pub const fn body(&self) -> Option<&ReplyBody> {
        self.body.as_ref()
    }

    /// Decompose into parts for the response runner.
    #[must_use]
    pub fn into_parts(self) -> (StatusCode, HeaderMap, Option<ReplyBody>) {
        (self.status, self.headers, self.body)
    }
}

/// Routing-miss signal carrying the unmatched method and original path.
///
/// A miss is a control signal for router fall-through; it is never written
/// to the wire. If no route matches, the seal boundary formats it into a
/// client-visible 404-class [`Reply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFound {
    method: Method,
    path: String,
}

impl NotFound {
    /// Record a miss for the given method and original request path.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    /// The unmatched request method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// The original, un-rewritten request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for NotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no route matched {} {}", self.method, self.path)
    }
}
