//! Correlation-id middleware.
//!
//! Assigns every request a correlation id (taken from the
//! `x-correlation-id` header, or a fresh UUID), stores it in the request
//! extensions (where [`crate::bind::bind_app`] picks it up into the
//! pipeline's `RequestInfo`), wraps the request in a tracing span, and
//! reflects the id in the response header.

use axum::extract::Request;
use axum::response::Response;
use http::HeaderValue;
use std::task::{Context as TaskContext, Poll};
use tower::{Layer, Service};
use tracing::Instrument;
use uuid::Uuid;

/// Header carrying the correlation id.
pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

/// Create the correlation-id layer.
///
/// ```ignore
/// let bound = bind_app(app, capabilities)(axum::Router::new());
/// let router = bound.router.layer(correlation_layer());
/// ```
#[must_use]
pub fn correlation_layer() -> CorrelationLayer {
    CorrelationLayer
}

/// Layer installing [`CorrelationService`].
#[derive(Clone, Debug)]
pub struct CorrelationLayer;

impl<S> Layer<S> for CorrelationLayer {
    type Service = CorrelationService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CorrelationService { inner }
    }
}

/// Middleware service assigning and reflecting correlation ids.
#[derive(Clone, Debug)]
pub struct CorrelationService<S> {
    inner: S,
}

impl<S> Service<Request> for CorrelationService<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request) -> Self::Future {
        let correlation_id = request
            .headers()
            .get(CORRELATION_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value).ok())
            .unwrap_or_else(Uuid::new_v4);

        request.extensions_mut().insert(correlation_id);

        let span = tracing::info_span!(
            "http_request",
            correlation_id = %correlation_id,
            method = %request.method(),
            uri = %request.uri(),
        );

        let fut = self.inner.call(request);

        Box::pin(async move {
            let mut response = fut.instrument(span).await?;
            if let Ok(value) = HeaderValue::from_str(&correlation_id.to_string()) {
                response.headers_mut().insert(CORRELATION_ID_HEADER, value);
            }
            Ok(response)
        })
    }
}
