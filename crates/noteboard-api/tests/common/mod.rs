//! Shared helpers for router tests: an app over the in-memory store plus
//! request/response shortcuts.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use noteboard_api::{router, AppState, ServerConfig};
use noteboard_db::MemoryStore;

pub const USER: &str = "u1";

pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
}

pub fn build_test_app() -> TestApp {
    let store = MemoryStore::new();
    let config = ServerConfig::default();
    let state = AppState::new(
        Arc::new(store.categories()),
        Arc::new(store.notes()),
        &config,
    )
    .expect("default config is valid");
    TestApp {
        router: router(state, &config.allowed_origins),
        store,
    }
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(USER), None).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(USER), Some(body)).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
