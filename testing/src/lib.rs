//! # Quiver Testing
//!
//! Builders for exercising pipelines without a running server.
//!
//! [`TestRequest`] assembles a [`Context`] the same way the web binding
//! does from a live request, so unit tests for matchers, routers and
//! sealed apps run at memory speed.
//!
//! ## Example
//!
//! ```ignore
//! use quiver_testing::TestRequest;
//! use quiver_core::get;
//!
//! #[tokio::test]
//! async fn matches_user_route() {
//!     let ctx = TestRequest::get("/users/42").build();
//!     let outcome = get("/users/:id").run(ctx).await;
//!     assert!(outcome.is_next());
//! }
//! ```

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, Method};
use quiver_core::{Capabilities, Context, RequestInfo};
use uuid::Uuid;

/// Builder for a per-request [`Context`].
#[derive(Debug)]
pub struct TestRequest {
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
    capabilities: Capabilities,
    correlation_id: Option<Uuid>,
}

impl TestRequest {
    /// Start a request with an arbitrary method.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            capabilities: Capabilities::new(),
            correlation_id: None,
        }
    }

    /// Start a `GET` request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Start a `POST` request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Start a `PUT` request.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Start a `PATCH` request.
    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// Start a `DELETE` request.
    #[must_use]
    pub fn del(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a raw query string.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Attach a header.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Attach a JSON body (and matching content type).
    #[must_use]
    pub fn with_json(mut self, body: &serde_json::Value) -> Self {
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.body = Bytes::from(body.to_string());
        self
    }

    /// Attach a raw body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Inject a capability, as `bind_app` would at startup.
    #[must_use]
    pub fn with_capability<T: Send + Sync + 'static>(mut self, value: T) -> Self {
        self.capabilities.insert(value);
        self
    }

    /// Pin the correlation id instead of leaving it unset.
    #[must_use]
    pub const fn with_correlation_id(mut self, id: Uuid) -> Self {
        self.correlation_id = Some(id);
        self
    }

    /// Assemble the context.
    #[must_use]
    pub fn build(self) -> Context {
        let mut request = RequestInfo::new(self.method, self.path)
            .with_headers(self.headers)
            .with_body(self.body);
        if let Some(query) = self.query {
            request = request.with_query(query);
        }
        if let Some(id) = self.correlation_id {
            request = request.with_correlation_id(id);
        }
        Context::new(request, self.capabilities)
    }
}

/// Install a compact tracing subscriber for a test binary.
///
/// Safe to call from every test; only the first call installs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_context_with_request_fields() {
        let ctx = TestRequest::post("/users")
            .with_query("dry_run=1")
            .with_json(&json!({ "name": "ada" }))
            .build();

        let request = ctx.request();
        assert_eq!(request.method(), &Method::POST);
        assert_eq!(request.path(), "/users");
        assert_eq!(request.query(), Some("dry_run=1"));
        assert_eq!(request.headers().get(CONTENT_TYPE).unwrap(), "application/json");
        assert!(!request.body().is_empty());
    }

    #[test]
    fn injects_capabilities() {
        struct Clock(&'static str);
        let ctx = TestRequest::get("/").with_capability(Clock("frozen")).build();
        assert_eq!(ctx.capability::<Clock>().unwrap().0, "frozen");
    }
}
