//! Common test utilities for integration tests
//!
//! Every test gets its own migrated in-memory SQLite database and a router
//! built on top of it, so tests never share state.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use gestor_api::app::{build_router, AppState};
use gestor_api::config::{ApiConfig, Config, DatabaseConfig, LogConfig, LogFormat};
use gestor_shared::db::{self, pool};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::Service as _;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: SqlitePool,
    pub app: axum::Router,
    pub config: Config,
}

/// Status, headers and parsed body of one call
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: Value,
}

impl TestContext {
    /// Creates a new test context with a fresh database
    pub async fn new() -> anyhow::Result<Self> {
        let config = test_config();

        let db = db::connect_and_migrate(pool::DatabaseConfig::in_memory()).await?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext { db, app, config })
    }

    /// Sends a request and returns the raw response
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.app.clone().call(request).await.unwrap()
    }

    /// Sends a request with an optional JSON body and parses the reply
    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        into_test_response(self.send(request).await).await
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request("POST", uri, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> TestResponse {
        self.request("PATCH", uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.request("DELETE", uri, None).await
    }

    /// Creates a category through the API and returns its id
    pub async fn create_category(&self, name: &str) -> i64 {
        let res = self
            .post("/api/categoria/cadastrar", serde_json::json!({ "name": name }))
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
        res.body["id"].as_i64().unwrap()
    }

    /// Creates a user through the API and returns its id
    pub async fn create_user(&self, name: &str, email: &str) -> i64 {
        let res = self
            .post(
                "/api/usuario/cadastrar",
                serde_json::json!({ "name": name, "email": email }),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
        res.body["id"].as_i64().unwrap()
    }

    /// Creates a task through the API and returns its id
    pub async fn create_task(&self, title: &str, category_id: i64, user_id: i64) -> i64 {
        let res = self
            .post(
                "/api/tarefa/cadastrar",
                serde_json::json!({
                    "title": title,
                    "categoryId": category_id,
                    "userId": user_id,
                }),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
        res.body["id"].as_i64().unwrap()
    }
}

/// Configuration that does not depend on the process environment
pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        log: LogConfig {
            format: LogFormat::Pretty,
        },
    }
}

/// Reads the body; non-JSON bodies come back as a JSON string
pub async fn into_test_response(response: Response) -> TestResponse {
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

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
        location,
        body,
    }
}
