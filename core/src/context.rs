//! Request context and capability injection.
//!
//! A [`Context`] is created once per incoming request and carries three
//! things: an immutable snapshot of the request ([`RequestInfo`]), the
//! fixed set of startup-injected dependencies ([`Capabilities`]), and the
//! path parameters captured so far ([`PathParams`]).
//!
//! Extension is persistent: `with_params` and `with_capability` return a
//! new context and leave the original untouched, so a router branch that
//! misses can hand the unmodified context to the next branch. The
//! capability set only ever grows as a context moves through a pipeline.

use bytes::Bytes;
use http::{HeaderMap, Method};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Immutable snapshot of an incoming request.
///
/// The `path` is the original, un-rewritten request path: diagnostics
/// (notably [`NotFound`](crate::reply::NotFound)) always report what the
/// client actually sent.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    method: Method,
    path: String,
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
    correlation_id: Option<Uuid>,
}

impl RequestInfo {
    /// Create a request snapshot with the given method and path.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            correlation_id: None,
        }
    }

    /// Attach the raw query string.
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Attach the request headers.
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Attach the buffered request body.
    #[must_use]
    pub fn with_body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    /// Attach the correlation id assigned by the middleware layer.
    #[must_use]
    pub const fn with_correlation_id(mut self, id: Uuid) -> Self {
        self.correlation_id = Some(id);
        self
    }

    /// The request method.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// The original request path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The raw query string, if any.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// The request headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The buffered request body.
    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// The correlation id, if the middleware assigned one.
    #[must_use]
    pub const fn correlation_id(&self) -> Option<Uuid> {
        self.correlation_id
    }
}

/// Typed map of startup-injected dependencies.
///
/// Values are keyed by type, in the spirit of `http::Extensions`: one
/// value per concrete type. Capabilities are supplied once at bind time
/// and treated as read-only for the lifetime of the application.
#[derive(Default, Clone)]
pub struct Capabilities {
    entries: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Capabilities {
    /// Create an empty capability set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.insert(value);
        self
    }

    /// Insert a capability, replacing any previous value of the same type.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.entries.insert(TypeId::of::<T>(), Arc::new(value));
    }

    /// Look up a capability by type.
    #[must_use]
    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.entries
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|entry| entry.downcast::<T>().ok())
    }

    /// Number of injected capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("len", &self.entries.len())
            .finish()
    }
}

/// Path parameters captured by a route matcher.
///
/// Pattern `/users/:id` matched against `/users/42` yields exactly
/// `{ "id": "42" }`.
#[derive(Debug, Clone, Default)]
pub struct PathParams(Arc<HashMap<String, String>>);

impl PathParams {
    /// Look up a captured segment by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Iterate over captured `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of captured parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no parameters were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Per-request context threaded through a pipeline.
///
/// Cloning is cheap (the request snapshot and capability set are shared).
#[derive(Debug, Clone)]
pub struct Context {
    request: Arc<RequestInfo>,
    capabilities: Arc<Capabilities>,
    params: PathParams,
}

impl Context {
    /// Build a fresh context for one incoming request.
    #[must_use]
    pub fn new(request: RequestInfo, capabilities: Capabilities) -> Self {
        Self {
            request: Arc::new(request),
            capabilities: Arc::new(capabilities),
            params: PathParams::default(),
        }
    }

    /// The request snapshot.
    #[must_use]
    pub fn request(&self) -> &RequestInfo {
        &self.request
    }

    /// The path parameters captured so far.
    #[must_use]
    pub const fn params(&self) -> &PathParams {
        &self.params
    }

    /// Look up an injected capability by type.
    #[must_use]
    pub fn capability<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.capabilities.get::<T>()
    }

    /// The full capability set.
    #[must_use]
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// A new context with the given path parameters merged in.
    ///
    /// Existing parameters are kept; a new capture under the same name
    /// wins. The original context is unchanged.
    #[must_use]
    pub fn with_params(&self, captured: HashMap<String, String>) -> Self {
        let mut merged = self.params.0.as_ref().clone();
        merged.extend(captured);
        Self {
            request: Arc::clone(&self.request),
            capabilities: Arc::clone(&self.capabilities),
            params: PathParams(Arc::new(merged)),
        }
    }

    /// A new context with one more capability.
    ///
    /// The original context is unchanged; the capability set only grows.
    #[must_use]
    pub fn with_capability<T: Any + Send + Sync>(&self, value: T) -> Self {
        let mut capabilities = self.capabilities.as_ref().clone();
        capabilities.insert(value);
        Self {
            request: Arc::clone(&self.request),
            capabilities: Arc::new(capabilities),
            params: self.params.clone(),
        }
    }
}
