//! End-to-end scenario against the bound axum router.
//!
//! Covers the full path: catch-all mounting, context construction with
//! capabilities, matcher-driven routing, formatter 404s, and failure
//! containment, all over `tower::ServiceExt::oneshot` with no sockets.

#![allow(clippy::unwrap_used, clippy::panic)]

use axum::body::Body;
use http::{Request, StatusCode};
use quiver_core::{get, post, router, Capabilities, Reply};
use quiver_web::{
    bind_app, correlation_layer, internal_error_reply, not_found_reply, seal,
    CORRELATION_ID_HEADER,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

#[derive(Debug)]
struct UserStore {
    greeting: &'static str,
}

fn app() -> axum::Router {
    quiver_testing::init_tracing();

    let routes = router([
        get("/users/:id").handle(|ctx| async move {
            let store = ctx
                .capability::<UserStore>()
                .ok_or_else(|| anyhow::anyhow!("user store capability missing"))?;
            let id = ctx.params().get("id").unwrap_or_default().to_string();
            Ok(Reply::json(
                StatusCode::OK,
                json!({ "id": id, "greeting": store.greeting }),
            ))
        }),
        post("/users").handle(|_ctx| async move { Ok(Reply::created()) }),
        get("/denied").handle(|_ctx| async move {
            Ok(Reply::json(
                StatusCode::FORBIDDEN,
                json!({ "code": "FORBIDDEN", "message": "not yours" }),
            ))
        }),
        get("/panics").handle(|_ctx| async move { panic!("kaboom") }),
        get("/fails").handle(|_ctx| async move { Err(anyhow::anyhow!("db down")) }),
    ]);

    let sealed = seal(routes, Arc::new(not_found_reply), Arc::new(internal_error_reply));
    let capabilities = Capabilities::new().with(UserStore { greeting: "hello" });
    let bound = bind_app(sealed, capabilities)(axum::Router::new());
    bound.router.layer(correlation_layer())
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: &str, path: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn get_user_extracts_params_and_capability() {
    let response = app().oneshot(request("GET", "/users/42")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["id"], "42");
    assert_eq!(body["greeting"], "hello");
}

#[tokio::test]
async fn post_users_matches_literal_route() {
    let response = app().oneshot(request("POST", "/users")).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn unmatched_method_gets_formatter_404_with_original_request() {
    let response = app().oneshot(request("PUT", "/users/42")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(body["message"].as_str().unwrap().contains("PUT /users/42"));
}

#[tokio::test]
async fn domain_reply_passes_through_unchanged() {
    let response = app().oneshot(request("GET", "/denied")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = body_json(response).await;
    assert_eq!(body["code"], "FORBIDDEN");
}

#[tokio::test]
async fn panicking_handler_is_formatted_and_service_survives() {
    let response = app().oneshot(request("GET", "/panics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["code"], "INTERNAL_SERVER_ERROR");
    assert!(!body["message"].as_str().unwrap().contains("kaboom"));

    // The service keeps answering after a contained panic.
    let response = app().oneshot(request("GET", "/users/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn failing_handler_is_formatted_without_leaking_internals() {
    let response = app().oneshot(request("GET", "/fails")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert!(!body["message"].as_str().unwrap().contains("db down"));
}

#[tokio::test]
async fn correlation_id_is_reflected_in_the_response() {
    let supplied = Uuid::new_v4();
    let req = Request::builder()
        .method("GET")
        .uri("/users/42")
        .header(CORRELATION_ID_HEADER, supplied.to_string())
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(req).await.unwrap();
    let echoed = response.headers().get(CORRELATION_ID_HEADER).unwrap();
    assert_eq!(echoed.to_str().unwrap(), supplied.to_string());
}
