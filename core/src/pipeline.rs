//! Composable pipeline steps.
//!
//! A [`Pipeline`] wraps a single async step from [`Context`] to
//! [`Outcome`]. Steps compose two ways:
//!
//! - [`Pipeline::then`] sequences: a `Next` feeds the following step, any
//!   terminal outcome short-circuits.
//! - [`Pipeline::or`] (in [`crate::router`]) alternates: a `Miss` falls
//!   through to the next branch.
//!
//! Pipelines are cheap to clone and hold no per-request state; every run
//! starts from the caller's context.

use crate::context::Context;
use crate::outcome::Outcome;
use crate::reply::Reply;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

type BoxStep = dyn Fn(Context) -> BoxFuture<'static, Outcome> + Send + Sync;

/// A composable async step from context to outcome.
#[derive(Clone)]
pub struct Pipeline {
    step: Arc<BoxStep>,
}

impl Pipeline {
    /// Wrap an async function as a pipeline step.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// use quiver_core::{Outcome, Pipeline};
    ///
    /// let step = Pipeline::new(|ctx| async move { Outcome::Next(ctx) });
    /// ```
    pub fn new<F, Fut>(step: F) -> Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Outcome> + Send + 'static,
    {
        Self {
            step: Arc::new(move |ctx| step(ctx).boxed()),
        }
    }

    /// Run this pipeline against a context.
    pub async fn run(&self, ctx: Context) -> Outcome {
        (self.step)(ctx).await
    }

    /// Sequence another step after this one.
    ///
    /// `next` only runs if this pipeline yields `Next`; `Done`, `Miss`
    /// and `Failure` short-circuit.
    #[must_use]
    pub fn then(self, next: Pipeline) -> Pipeline {
        Pipeline::new(move |ctx| {
            let first = self.clone();
            let second = next.clone();
            async move {
                match first.run(ctx).await {
                    Outcome::Next(extended) => second.run(extended).await,
                    settled => settled,
                }
            }
        })
    }

    /// Terminate this pipeline with a reply-producing handler.
    ///
    /// The handler's `Ok` becomes `Done`, its `Err` becomes `Failure`
    /// (and is formatted at the seal boundary, never shown raw).
    #[must_use]
    pub fn handle<F, Fut>(self, handler: F) -> Pipeline
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Reply, anyhow::Error>> + Send + 'static,
    {
        self.then(Pipeline::new(move |ctx| {
            let fut = handler(ctx);
            async move {
                match fut.await {
                    Ok(reply) => Outcome::Done(reply),
                    Err(error) => Outcome::Failure(error),
                }
            }
        }))
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pipeline")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use http::StatusCode;
    use quiver_core::{Outcome, Pipeline, Reply};
    use quiver_testing::TestRequest;

    fn advance() -> Pipeline {
        Pipeline::new(|ctx| async move { Outcome::Next(ctx) })
    }

    #[tokio::test]
    async fn then_feeds_next_on_advance() {
        let pipeline = advance().handle(|_ctx| async move { Ok(Reply::ok()) });
        let outcome = pipeline.run(TestRequest::get("/").build()).await;
        assert!(outcome.is_done());
    }

    #[tokio::test]
    async fn then_short_circuits_on_done() {
        let first = Pipeline::new(|_ctx| async move {
            Outcome::Done(Reply::new(StatusCode::FORBIDDEN))
        });
        let pipeline = first.handle(|_ctx| async move { Ok(Reply::ok()) });

        match pipeline.run(TestRequest::get("/").build()).await {
            Outcome::Done(reply) => assert_eq!(reply.status(), StatusCode::FORBIDDEN),
            other => panic!("expected Done, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn handler_error_becomes_failure() {
        let pipeline = advance().handle(|_ctx| async move {
            Err(anyhow::anyhow!("capability unavailable"))
        });
        let outcome = pipeline.run(TestRequest::get("/").build()).await;
        assert!(outcome.is_failure());
    }
}
