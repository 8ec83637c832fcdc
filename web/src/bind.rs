//! Mounting sealed apps and pipelines on an `axum::Router`.
//!
//! Both entry points register a single catch-all handler (axum's
//! fallback, all methods and paths) and leave routing decisions to the
//! pipeline's own matchers and `router` composition rather than axum's
//! native routing table.

use crate::format::not_found_reply;
use crate::runner::run_response;
use crate::seal::{seal, ErrorFormatter, HttpApp, NotFoundFormatter};
use axum::extract::Request;
use axum::response::Response;
use http::StatusCode;
use quiver_core::{Capabilities, Context, NotFound, Pipeline, Reply, RequestInfo};
use std::sync::Arc;
use uuid::Uuid;

/// Cap on buffered request bodies.
const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Failure while turning a framework request into a [`Context`].
#[derive(Debug, thiserror::Error)]
enum BindError {
    #[error("failed to buffer request body: {0}")]
    BodyRead(#[from] axum::Error),
}

/// A mounted application, exposed for introspection and testing.
#[derive(Debug)]
pub struct BoundApp {
    /// The axum router with the catch-all entry point installed.
    pub router: axum::Router,
    /// The fixed capability set every context is built from.
    pub capabilities: Capabilities,
}

/// Mount a sealed [`HttpApp`] with a fixed capability set.
///
/// Every incoming request gets a fresh context: the buffered request,
/// the startup capabilities, and the correlation id if the
/// [`crate::middleware::correlation_layer`] is installed. The
/// capabilities are shared read-only across concurrent requests.
///
/// ```ignore
/// let bound = bind_app(app, capabilities)(axum::Router::new());
/// axum::serve(listener, bound.router).await?;
/// ```
pub fn bind_app(
    app: HttpApp,
    capabilities: Capabilities,
) -> impl FnOnce(axum::Router) -> BoundApp {
    move |router: axum::Router| {
        let handler_capabilities = capabilities.clone();
        let handler = move |request: Request| {
            let app = Arc::clone(&app);
            let capabilities = handler_capabilities.clone();
            async move { dispatch(app, capabilities, request).await }
        };
        BoundApp {
            router: router.fallback(handler),
            capabilities,
        }
    }
}

/// Mount an unsealed pipeline directly.
///
/// Seals with the caller's error formatter and the stock not-found
/// formatter: the same three-way classification as [`seal`], minus
/// custom not-found formatting.
pub fn bind_pipeline(
    pipeline: Pipeline,
) -> impl FnOnce(axum::Router, Capabilities, ErrorFormatter) -> BoundApp {
    move |router, capabilities, on_error| {
        let on_miss: NotFoundFormatter = Arc::new(|miss: &NotFound| not_found_reply(miss));
        let app = seal(pipeline, on_miss, on_error);
        bind_app(app, capabilities)(router)
    }
}

async fn dispatch(app: HttpApp, capabilities: Capabilities, request: Request) -> Response {
    let ctx = match context_from_request(request, capabilities).await {
        Ok(ctx) => ctx,
        Err(error) => {
            // The pipeline never ran; there is no caller formatter in
            // scope yet, so answer with a minimal reply directly.
            tracing::warn!(error = %error, "request rejected before pipeline");
            return run_response(Reply::text(
                StatusCode::PAYLOAD_TOO_LARGE,
                "request body too large",
            ));
        },
    };
    run_response(app(ctx).await)
}

async fn context_from_request(
    request: Request,
    capabilities: Capabilities,
) -> Result<Context, BindError> {
    let correlation_id = request.extensions().get::<Uuid>().copied();
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, BODY_LIMIT).await?;

    let mut info = RequestInfo::new(parts.method, parts.uri.path())
        .with_headers(parts.headers)
        .with_body(bytes);
    if let Some(query) = parts.uri.query() {
        info = info.with_query(query);
    }
    if let Some(id) = correlation_id {
        info = info.with_correlation_id(id);
    }
    Ok(Context::new(info, capabilities))
}
