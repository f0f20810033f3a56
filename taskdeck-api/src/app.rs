/// Application state and router builder
///
/// Defines the shared application state and assembles the Axum router
/// with all routes and middleware. Dependencies flow in explicitly: the
/// pool and configuration are constructed in `main` and handed to
/// [`AppState::new`]; the authenticator gets the pool and signing secret
/// at router-build time.
use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskdeck_shared::auth::middleware::require_auth;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned per request by Axum's `State` extractor; `Arc` keeps the
/// clone cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the JWT signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router
///
/// ```text
/// /
/// ├── /health              # Health check (public)
/// ├── /auth/
/// │   ├── POST /register   # Create account (public)
/// │   └── POST /login      # Authenticate (public)
/// └── /tasks/              # Task CRUD (bearer token required)
///     ├── POST   /
///     ├── GET    /?status=
///     ├── GET    /:id
///     ├── PUT    /:id
///     └── DELETE /:id
/// ```
///
/// Middleware, outermost first: request tracing, CORS, then the
/// authenticator on the `/tasks` subtree only.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let task_routes = Router::new()
        .route(
            "/",
            post(routes::tasks::create_task).get(routes::tasks::list_tasks),
        )
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .layer(axum::middleware::from_fn(require_auth(
            state.db.clone(),
            state.jwt_secret().to_string(),
        )));

    let cors = build_cors_layer(&state.config.api.cors_origins);

    Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .nest("/tasks", task_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// CORS policy from the configured origin allow-list.
///
/// A `*` entry yields a permissive layer (development); otherwise only
/// the listed origins may send credentialed requests with the
/// Authorization header.
fn build_cors_layer(cors_origins: &[String]) -> CorsLayer {
    if cors_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_layer_builds_for_explicit_origins() {
        // Smoke test: both branches construct without panicking.
        let _ = build_cors_layer(&["*".to_string()]);
        let _ = build_cors_layer(&[
            "http://localhost:3000".to_string(),
            "https://app.example.com".to_string(),
        ]);
    }
}
