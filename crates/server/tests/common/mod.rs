//! Common test utilities for API testing with a mock catalog.
//!
//! This module provides a test fixture that builds the router in-process
//! around a search session backed by [`MockCatalog`], so the whole HTTP
//! surface can be exercised without reaching OMDb.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use moviesearch_core::{
    testing::MockCatalog, CatalogClient, Config, MovieCatalog, SearchSession, SessionConfig,
};
use moviesearch_server::state::AppState;

/// Re-export fixtures for test convenience
pub use moviesearch_core::testing::fixtures;

/// Test fixture for API testing with a mock catalog.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test(start_paused = true)]
/// async fn test_search() {
///     let fixture = TestFixture::new().await;
///     fixture.catalog.set_search_results("matrix", vec![fixtures::matrix()]).await;
///
///     fixture.put("/api/v1/session/query", json!({ "query": "matrix" })).await;
///     fixture.settle().await;
///
///     let response = fixture.get("/api/v1/session").await;
///     assert_eq!(response.body["results"][0]["title"], "The Matrix");
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock catalog - configure search results and details
    pub catalog: Arc<MockCatalog>,
    /// The session behind the router, `None` for an unconfigured server
    pub session: Option<SearchSession>,
    /// Session settings the fixture was built with
    pub session_config: SessionConfig,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    /// Raw body, for non-JSON endpoints
    pub text: String,
}

impl TestFixture {
    /// Create a new test fixture with a configured session.
    pub async fn new() -> Self {
        Self::build(true)
    }

    /// Create a fixture that behaves like a server without an API key.
    pub async fn unconfigured() -> Self {
        Self::build(false)
    }

    fn build(configured: bool) -> Self {
        let catalog = Arc::new(MockCatalog::new());
        let mut config = Config::default();
        if configured {
            config.omdb.api_key = "test-key".to_string();
        }
        let session_config = config.session.clone();

        let session = configured.then(|| {
            SearchSession::new(
                CatalogClient::new(Arc::clone(&catalog) as Arc<dyn MovieCatalog>),
                &session_config,
            )
        });

        let state = Arc::new(AppState::new(config, session.clone()));
        let router = moviesearch_server::api::create_router(state);

        Self {
            router,
            catalog,
            session,
            session_config,
        }
    }

    /// Let the debounce period elapse and spawned work finish.
    ///
    /// Intended for tests running with paused time.
    pub async fn settle(&self) {
        tokio::time::sleep(self.session_config.debounce() + std::time::Duration::from_millis(50))
            .await;
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request without a body.
    pub async fn post(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    /// Send a PUT request with JSON body.
    pub async fn put(&self, path: &str, body: Value) -> TestResponse {
        self.request("PUT", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a PUT request with raw string body (for testing malformed JSON).
    pub async fn put_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("PUT")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body, text }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status, $response.status, $response.text
        );
    };
}
