/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - An app over a fresh seeded in-memory store
/// - Request helpers returning status, headers and parsed JSON

use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use clientdb_api::app::{build_router, AppState};
use clientdb_api::config::Config;
use clientdb_shared::db::StorageBackend;
use clientdb_shared::seed;
use serde_json::Value;
use tower::Service as _;

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: StorageBackend,
    pub app: axum::Router,
}

/// Parsed response
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// `X-Total-Count` as a number
    pub fn total_count(&self) -> usize {
        self.headers
            .get("x-total-count")
            .expect("missing X-Total-Count")
            .to_str()
            .unwrap()
            .parse()
            .unwrap()
    }
}

impl TestContext {
    /// Creates a context over an empty in-memory store
    pub fn empty() -> Self {
        let config = Config::from_lookup(|_| None).expect("default config");
        let store = StorageBackend::in_memory();
        let app = build_router(AppState::new(store.clone(), config));
        Self { store, app }
    }

    /// Creates a context with the bundled seed data loaded
    pub async fn seeded() -> Self {
        let ctx = Self::empty();
        seed::load_bundled(&ctx.store).await.expect("seed failed");
        ctx
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .call(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, Some(body)).await
    }

    /// Id of the first record in a collection
    pub async fn first_id(&self, collection: &str) -> String {
        let response = self.get(&format!("/api/{}?_start=0&_end=1", collection)).await;
        response.body[0]["id"].as_str().unwrap().to_string()
    }
}
