/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use gestor_api::{app::AppState, config::Config};
/// use gestor_shared::db::{self, pool::DatabaseConfig};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = db::connect_and_migrate(DatabaseConfig {
///     url: config.database.url.clone(),
///     ..Default::default()
/// })
/// .await?;
/// let state = AppState::new(pool, config);
/// let app = gestor_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, routes};
use axum::{
    http::{header, HeaderValue, Method},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use std::{any::Any, sync::Arc};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: SqlitePool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET /                          # Banner
/// ├── GET /health                    # Health check
/// └── /api/
///     ├── /categoria/
///     │   ├── GET    /listar
///     │   ├── POST   /cadastrar
///     │   ├── GET    /buscar/:nome
///     │   ├── GET    /:id
///     │   ├── PATCH  /:id            # also PUT
///     │   └── DELETE /:id
///     ├── /usuario/
///     │   ├── GET    /listar
///     │   ├── POST   /cadastrar
///     │   ├── GET    /buscar/:nome
///     │   ├── GET    /:id
///     │   ├── PATCH  /:id
///     │   └── DELETE /:id
///     └── /tarefa/
///         ├── GET    /listar
///         ├── POST   /cadastrar
///         ├── GET    /buscar/:titulo
///         ├── GET    /:id
///         ├── PATCH  /:id
///         └── DELETE /:id
/// ```
///
/// Unmatched paths get a JSON 404.
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Panic recovery (tower-http CatchPanicLayer)
pub fn build_router(state: AppState) -> Router {
    let category_routes = Router::new()
        .route("/listar", get(routes::categories::list_categories))
        .route("/cadastrar", post(routes::categories::create_category))
        .route("/buscar/:nome", get(routes::categories::find_category_by_name))
        .route(
            "/:id",
            get(routes::categories::get_category)
                .patch(routes::categories::update_category)
                .put(routes::categories::update_category)
                .delete(routes::categories::delete_category),
        );

    let user_routes = Router::new()
        .route("/listar", get(routes::users::list_users))
        .route("/cadastrar", post(routes::users::create_user))
        .route("/buscar/:nome", get(routes::users::find_user_by_name))
        .route(
            "/:id",
            get(routes::users::get_user)
                .patch(routes::users::update_user)
                .delete(routes::users::delete_user),
        );

    let task_routes = Router::new()
        .route("/listar", get(routes::tasks::list_tasks))
        .route("/cadastrar", post(routes::tasks::create_task))
        .route("/buscar/:titulo", get(routes::tasks::find_task_by_title))
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .patch(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        );

    let api_routes = Router::new()
        .nest("/categoria", category_routes)
        .nest("/usuario", user_routes)
        .nest("/tarefa", task_routes);

    let cors = cors_layer(&state.config);

    Router::new()
        .route("/", get(routes::health::index))
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .fallback(routes::not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_permissive() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([header::LOCATION])
        .max_age(std::time::Duration::from_secs(3600))
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    ApiError::InternalError(format!("handler panicked: {}", detail)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_panic_response_is_internal_error() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
