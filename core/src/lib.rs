//! # Quiver Core
//!
//! Composition primitives for expressing HTTP route handlers as typed,
//! effectful pipelines.
//!
//! A pipeline is a step from a request [`Context`] to an [`Outcome`]:
//!
//! - **`Next(Context)`**: the step succeeded and extended the context
//!   (e.g. with captured path parameters); the chain continues.
//! - **`Done(Reply)`**: a terminal, wire-ready reply. Covers both a
//!   success reply and an intentional short-circuit such as an
//!   authorization rejection.
//! - **`Miss(NotFound)`**: a routing miss. Purely a control signal for
//!   [`router`] fall-through; never written to the wire directly.
//! - **`Failure(anyhow::Error)`**: an unexpected failure, formatted into a
//!   reply at the seal boundary by `quiver-web`.
//!
//! This crate knows nothing about any concrete server framework. The axum
//! binding lives in `quiver-web`.
//!
//! ## Example
//!
//! ```ignore
//! use quiver_core::{get, post, router, Reply};
//! use http::StatusCode;
//! use serde_json::json;
//!
//! let routes = router([
//!     get("/users/:id").handle(|ctx| async move {
//!         let id = ctx.params().get("id").unwrap_or_default().to_string();
//!         Ok(Reply::json(StatusCode::OK, json!({ "id": id })))
//!     }),
//!     post("/users").handle(|_ctx| async move {
//!         Ok(Reply::new(StatusCode::CREATED))
//!     }),
//! ]);
//! ```

pub mod context;
pub mod outcome;
pub mod pipeline;
pub mod reply;
pub mod route;
pub mod router;

pub use context::{Capabilities, Context, PathParams, RequestInfo};
pub use outcome::Outcome;
pub use pipeline::Pipeline;
pub use reply::{NotFound, Reply, ReplyBody};
pub use route::{del, get, head, options, patch, post, put, route};
pub use router::router;
