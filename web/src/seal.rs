//! Sealing: pipeline → request handler with full failure classification.
//!
//! Classification happens exactly once, here, by pattern match on the
//! pipeline's explicit outcome, never by inspecting a caught value:
//!
//! - `Done(reply)`: used directly, success or intentional short-circuit.
//! - `Miss(not_found)`: formatted by the caller's not-found formatter.
//! - `Failure(error)`: logged, then formatted by the caller's error
//!   formatter; the raw error never reaches the client.
//! - a panicking step is caught and treated as a failure, so a buggy
//!   handler cannot hang or tear down the connection.

use futures::future::BoxFuture;
use futures::FutureExt;
use quiver_core::{Context, NotFound, Outcome, Pipeline, Reply};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// A sealed pipeline: one reply per invocation, no other outcome.
pub type HttpApp = Arc<dyn Fn(Context) -> BoxFuture<'static, Reply> + Send + Sync>;

/// Formats a routing miss into the client-visible 404-class reply.
pub type NotFoundFormatter = Arc<dyn Fn(&NotFound) -> Reply + Send + Sync>;

/// Formats an unexpected failure into the client-visible reply.
pub type ErrorFormatter = Arc<dyn Fn(&anyhow::Error) -> Reply + Send + Sync>;

/// Convert a composed pipeline into an [`HttpApp`].
///
/// Exactly one [`Reply`] is produced per invocation; it is the sole
/// input to the response runner. A pipeline that ends on `Next` (i.e.
/// was never terminated with a handler) is reported through the error
/// formatter rather than panicking.
#[must_use]
pub fn seal(
    pipeline: Pipeline,
    on_not_found: NotFoundFormatter,
    on_error: ErrorFormatter,
) -> HttpApp {
    Arc::new(move |ctx: Context| {
        let pipeline = pipeline.clone();
        let on_not_found = Arc::clone(&on_not_found);
        let on_error = Arc::clone(&on_error);
        async move {
            match AssertUnwindSafe(pipeline.run(ctx)).catch_unwind().await {
                Ok(Outcome::Done(reply)) => reply,
                Ok(Outcome::Miss(miss)) => {
                    tracing::debug!(%miss, "no route matched");
                    on_not_found(&miss)
                },
                Ok(Outcome::Failure(error)) => {
                    tracing::error!(error = %error, "pipeline failed");
                    on_error(&error)
                },
                Ok(Outcome::Next(_)) => {
                    let error = anyhow::anyhow!("pipeline ended without producing a reply");
                    tracing::error!(error = %error, "pipeline misconfigured");
                    on_error(&error)
                },
                Err(panic) => {
                    let error =
                        anyhow::anyhow!("handler panicked: {}", panic_message(panic.as_ref()));
                    tracing::error!(error = %error, "pipeline panicked");
                    on_error(&error)
                },
            }
        }
        .boxed()
    })
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
