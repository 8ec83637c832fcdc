//! # Quiver Web
//!
//! Axum binding for `quiver-core` pipelines.
//!
//! The pipeline layer owns routing decisions; axum owns HTTP. A composed
//! pipeline is [`seal`]ed into an [`HttpApp`] (full three-way failure
//! classification) and mounted with [`bind_app`] as a single catch-all
//! entry point on an `axum::Router`:
//!
//! ```text
//! request ──▶ catch-all handler ──▶ Context (request + capabilities)
//!                 │
//!                 ▼
//!        sealed pipeline ──▶ Done / Miss / Failure
//!                 │               │       │
//!                 │        not-found   error
//!                 │         formatter  formatter
//!                 ▼               ▼       ▼
//!            exactly one Reply ──▶ response runner ──▶ wire
//! ```
//!
//! The client always receives a well-formed reply: misses go through the
//! not-found formatter, unexpected failures (including panics) through
//! the error formatter, and an intentional domain reply passes through
//! untouched.
//!
//! ## Example
//!
//! ```ignore
//! use quiver_core::{get, router, Capabilities, Reply};
//! use quiver_web::{bind_app, internal_error_reply, not_found_reply, seal};
//! use std::sync::Arc;
//!
//! let routes = router([get("/health").handle(|_ctx| async { Ok(Reply::ok()) })]);
//! let app = seal(
//!     routes,
//!     Arc::new(not_found_reply),
//!     Arc::new(internal_error_reply),
//! );
//! let bound = bind_app(app, Capabilities::new())(axum::Router::new());
//! // axum::serve(listener, bound.router).await
//! ```

pub mod bind;
pub mod format;
pub mod middleware;
pub mod runner;
pub mod seal;

pub use bind::{bind_app, bind_pipeline, BoundApp};
pub use format::{internal_error_reply, not_found_reply};
pub use middleware::{correlation_layer, CORRELATION_ID_HEADER};
pub use runner::run_response;
pub use seal::{seal, ErrorFormatter, HttpApp, NotFoundFormatter};
