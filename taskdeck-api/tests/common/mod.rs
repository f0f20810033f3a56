/// Common test utilities for integration tests
///
/// Shared infrastructure for driving the full router in-process:
/// - test database setup (connect + migrate)
/// - unique throwaway accounts per test
/// - request helpers that return (status, parsed JSON body)
///
/// These tests need a live PostgreSQL reachable via `DATABASE_URL`, so
/// every test that uses this module is `#[ignore]`d by default:
///
/// ```bash
/// DATABASE_URL=... JWT_SECRET=... cargo test -p taskdeck-api -- --ignored
/// ```
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use sqlx::PgPool;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use taskdeck_api::app::{build_router, AppState};
use taskdeck_api::config::Config;
use taskdeck_shared::db::migrations::ensure_database_exists;
use tower::ServiceExt;

static EMAIL_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Test context containing the database pool and the assembled router
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
}

/// A registered account created for one test
pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub token: String,
}

impl TestContext {
    /// Connects, migrates, and builds the router.
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        ensure_database_exists(&config.database.url).await?;
        let db = PgPool::connect(&config.database.url).await?;

        // Path relative to this crate's Cargo.toml
        sqlx::migrate!("../migrations").run(&db).await?;

        let state = AppState::new(db.clone(), config.clone());
        let app = build_router(state);

        Ok(TestContext { db, app, config })
    }

    /// Sends a request through the router and parses the JSON body.
    ///
    /// Empty bodies (e.g. 204 responses) come back as `Value::Null`.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, body)
    }

    /// Registers a fresh account and returns its id, email, and token.
    pub async fn signup(&self, name: &str) -> TestUser {
        let email = unique_email(name);
        let (status, body) = self
            .request(
                "POST",
                "/auth/register",
                None,
                Some(json!({
                    "email": email,
                    "password": "secret123",
                    "name": name,
                })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);

        TestUser {
            id: body["user"]["id"].as_i64().expect("user id in response"),
            email,
            token: body["token"].as_str().expect("token in response").to_string(),
        }
    }

    /// Creates a task for the given user and returns the response body.
    pub async fn create_task(
        &self,
        user: &TestUser,
        title: &str,
        status: &str,
        due_date: &str,
    ) -> (StatusCode, Value) {
        self.request(
            "POST",
            "/tasks",
            Some(&user.token),
            Some(json!({
                "title": title,
                "description": format!("{} description", title),
                "status": status,
                "dueDate": due_date,
            })),
        )
        .await
    }

    /// Removes a test account; tasks cascade.
    pub async fn cleanup_user(&self, user: &TestUser) {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user.id)
            .execute(&self.db)
            .await
            .expect("cleanup should succeed");
    }
}

/// A process-unique email so parallel tests never collide.
pub fn unique_email(prefix: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let n = EMAIL_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}-{}@example.com", prefix, nanos, n)
}
