//! Ordered alternation over pipeline branches.
//!
//! [`router`] composes branches tried strictly in declaration order. The
//! fall-through rule is narrow on purpose: only an [`Outcome::Miss`] moves
//! on to the next branch. A `Done` (even one signalling a domain error
//! such as a 403) is a terminal decision and is never second-guessed by
//! a later branch, and a `Failure` propagates for the seal boundary to
//! format.

use crate::context::Context;
use crate::outcome::Outcome;
use crate::pipeline::Pipeline;
use crate::reply::NotFound;

impl Pipeline {
    /// Try `self`, falling through to `other` only on a routing miss.
    ///
    /// `other` receives the original context, not anything `self` may
    /// have produced before missing. `or` is associative, so grouping of
    /// nested alternations does not change behavior.
    #[must_use]
    pub fn or(self, other: Pipeline) -> Pipeline {
        Pipeline::new(move |ctx| {
            let left = self.clone();
            let right = other.clone();
            async move {
                let original = ctx.clone();
                match left.run(ctx).await {
                    Outcome::Miss(_) => right.run(original).await,
                    settled => settled,
                }
            }
        })
    }
}

/// Compose an ordered sequence of branches into one pipeline.
///
/// A left fold of [`Pipeline::or`]: first matching branch wins, a miss
/// tries the next branch, and the last branch's miss propagates to the
/// caller. An empty sequence yields a pipeline that always misses.
///
/// # Examples
///
/// ```ignore
/// use quiver_core::{get, post, router, Reply};
///
/// let routes = router([
///     get("/users/:id").handle(show_user),
///     post("/users").handle(create_user),
/// ]);
/// ```
pub fn router<I>(branches: I) -> Pipeline
where
    I: IntoIterator<Item = Pipeline>,
{
    branches
        .into_iter()
        .reduce(Pipeline::or)
        .unwrap_or_else(miss_all)
}

/// A pipeline that misses every request.
fn miss_all() -> Pipeline {
    Pipeline::new(|ctx: Context| async move {
        let request = ctx.request();
        Outcome::Miss(NotFound::new(request.method().clone(), request.path()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use http::StatusCode;
    use quiver_core::{router, Context, NotFound, Outcome, Pipeline, Reply};
    use quiver_testing::TestRequest;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting(outcome: fn(Context) -> Outcome, calls: Arc<AtomicUsize>) -> Pipeline {
        Pipeline::new(move |ctx| {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                outcome(ctx)
            }
        })
    }

    fn miss(ctx: Context) -> Outcome {
        let request = ctx.request();
        Outcome::Miss(NotFound::new(request.method().clone(), request.path()))
    }

    #[tokio::test]
    async fn first_success_skips_later_branches() {
        let later = Arc::new(AtomicUsize::new(0));
        let routes = router([
            Pipeline::new(|_ctx| async move { Outcome::Done(Reply::ok()) }),
            counting(miss, Arc::clone(&later)),
        ]);

        let outcome = routes.run(TestRequest::get("/a").build()).await;
        assert!(outcome.is_done());
        assert_eq!(later.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn miss_falls_through_with_original_context() {
        // The first branch extends the context before missing; the second
        // branch must still see the pristine one.
        let first = Pipeline::new(|ctx: Context| async move {
            let extended =
                ctx.with_params(HashMap::from([("leak".to_string(), "yes".to_string())]));
            let request = extended.request();
            Outcome::Miss(NotFound::new(request.method().clone(), request.path()))
        });
        let second = Pipeline::new(|ctx: Context| async move {
            assert!(ctx.params().get("leak").is_none());
            Outcome::Done(Reply::ok())
        });

        let outcome = first.or(second).run(TestRequest::get("/b").build()).await;
        assert!(outcome.is_done());
    }

    #[tokio::test]
    async fn done_as_domain_error_stops_fall_through() {
        let later = Arc::new(AtomicUsize::new(0));
        let routes = router([
            Pipeline::new(|_ctx| async move {
                Outcome::Done(Reply::new(StatusCode::FORBIDDEN))
            }),
            counting(|_ctx| Outcome::Done(Reply::ok()), Arc::clone(&later)),
        ]);

        match routes.run(TestRequest::get("/c").build()).await {
            Outcome::Done(reply) => assert_eq!(reply.status(), StatusCode::FORBIDDEN),
            other => panic!("expected Done, got {other:?}"),
        }
        assert_eq!(later.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failure_propagates_without_fall_through() {
        let later = Arc::new(AtomicUsize::new(0));
        let routes = router([
            Pipeline::new(|_ctx| async move {
                Outcome::Failure(anyhow::anyhow!("store unavailable"))
            }),
            counting(|_ctx| Outcome::Done(Reply::ok()), Arc::clone(&later)),
        ]);

        let outcome = routes.run(TestRequest::get("/d").build()).await;
        assert!(outcome.is_failure());
        assert_eq!(later.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn last_miss_propagates() {
        let routes = router([Pipeline::new(|ctx: Context| async move { miss(ctx) })]);
        let outcome = routes.run(TestRequest::put("/users/42").build()).await;
        match outcome {
            Outcome::Miss(not_found) => {
                assert_eq!(not_found.path(), "/users/42");
                assert_eq!(not_found.method(), &http::Method::PUT);
            },
            other => panic!("expected Miss, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_router_always_misses() {
        let outcome = router(Vec::<Pipeline>::new())
            .run(TestRequest::get("/nowhere").build())
            .await;
        assert!(outcome.is_miss());
    }
}
