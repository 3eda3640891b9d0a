//! Common test utilities for API testing.
//!
//! This module provides a test fixture that creates an in-process server
//! backed by a temporary SQLite exclusion store, so tests exercise the real
//! router without binding a port.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use seatscout_core::{Config, DatabaseConfig, ExclusionStore, SelectionConfig, SqliteExclusionStore};
use seatscout_server::state::AppState;

/// Test fixture for API testing.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_health() {
///     let fixture = TestFixture::new();
///     let response = fixture.get("/api/v1/health").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Shared state behind the router
    pub state: Arc<AppState>,
    /// Temporary directory holding the test database
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a fixture with default selection settings and a fixed seed.
    pub fn new() -> Self {
        Self::with_selection(SelectionConfig {
            seed: Some(7),
            ..Default::default()
        })
    }

    /// Create a fixture with custom selection settings.
    pub fn with_selection(selection: SelectionConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let config = Config {
            database: DatabaseConfig {
                path: db_path.clone(),
            },
            selection,
            ..Default::default()
        };

        let store: Arc<dyn ExclusionStore> = Arc::new(
            SqliteExclusionStore::new(&db_path).expect("Failed to create exclusion store"),
        );
        let state = Arc::new(AppState::new(config, store));
        let router = seatscout_server::api::create_router(Arc::clone(&state));

        Self {
            router,
            state,
            temp_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Send a request and return the raw body as text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
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

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Snapshot JSON with one seated and one standing category.
pub fn sample_snapshot() -> Value {
    serde_json::json!({
        "priceRangeCategories": [
            {
                "id": 11,
                "name": {"de": "Kategorie 1", "en": "Category 1"},
                "blocks": [{"id": 5}, {"id": 9}, {"id": "17"}],
                "areaBlocksAvailability": {
                    "5": {"availability": 2},
                    "9": {"availability": 4, "availabilityResale": 1},
                    "17": {"availability": 1, "availabilityResale": 9}
                }
            },
            {
                "id": 42,
                "name": {"de": "Stehplatz"},
                "areas": [{"id": 100}],
                "areaBlocksAvailability": {"100": {"availability": 50}}
            }
        ]
    })
}

/// Seat feature collection for block 17.
pub fn sample_seats() -> Value {
    let feature = |id: u64, row: &str, number: u64| {
        serde_json::json!({
            "type": "Feature",
            "id": id,
            "properties": {
                "row": row,
                "number": number,
                "seatCategory": "Kategorie 1",
                "area": {"name": {"de": "Nord"}},
                "block": {"id": 17}
            }
        })
    };

    serde_json::json!({
        "type": "FeatureCollection",
        "features": [
            feature(1, "10", 1),
            feature(2, "10", 3),
            feature(3, "9", 2),
            feature(4, "3", 20)
        ]
    })
}
