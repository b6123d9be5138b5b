/// Banner and health check endpoints
///
/// # Endpoints
///
/// ```text
/// GET /        -> plain-text banner
/// GET /health  -> JSON health report
/// ```
///
/// # Health response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "migrations": 1
/// }
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Json};
use gestor_shared::db::{migrations, pool};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Database status
    pub database: String,

    /// Number of applied schema migrations
    pub migrations: usize,
}

/// Root banner
pub async fn index() -> &'static str {
    "Task manager API: tasks, categories and users"
}

/// Health check handler
///
/// Reports `degraded` instead of failing when the database or its
/// migration bookkeeping does not answer.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<HealthResponse>> {
    if let Err(e) = pool::health_check(&state.db).await {
        warn!(error = %e, "Database health check failed");
        return Ok(Json(health_report(false, None)));
    }

    let applied = match migrations::get_migration_status(&state.db).await {
        Ok(status) => Some(status.applied_migrations),
        Err(e) => {
            warn!(error = %e, "Failed to read migration status");
            None
        }
    };

    Ok(Json(health_report(true, applied)))
}

fn health_report(connected: bool, applied_migrations: Option<usize>) -> HealthResponse {
    let healthy = connected && applied_migrations.is_some();

    HealthResponse {
        status: if healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if connected { "connected" } else { "disconnected" }.to_string(),
        migrations: applied_migrations.unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_healthy() {
        let report = health_report(true, Some(1));
        assert_eq!(report.status, "healthy");
        assert_eq!(report.database, "connected");
        assert_eq!(report.migrations, 1);
    }

    #[test]
    fn test_unreadable_migrations_report_degraded() {
        let report = health_report(true, None);
        assert_eq!(report.status, "degraded");
        assert_eq!(report.database, "connected");
        assert_eq!(report.migrations, 0);
    }

    #[test]
    fn test_disconnected_reports_degraded() {
        let report = health_report(false, None);
        assert_eq!(report.status, "degraded");
        assert_eq!(report.database, "disconnected");
    }
}
