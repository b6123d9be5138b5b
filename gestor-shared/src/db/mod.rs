/// Database layer for the task manager
///
/// This module provides the SQLite connection pool and the embedded
/// migration runner. Entity models and their queries live in the
/// `models` module at crate root level.
///
/// # Modules
///
/// - `pool`: SQLite connection pool management with health checks
/// - `migrations`: Embedded schema migrations, applied at startup
///
/// # Example
///
/// ```no_run
/// use gestor_shared::db::{self, pool::DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: "sqlite:gestor_tarefas.db".to_string(),
///         ..Default::default()
///     };
///
///     let pool = db::connect_and_migrate(config).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;

use sqlx::SqlitePool;
use thiserror::Error;

/// Errors raised while setting up the database
#[derive(Debug, Error)]
pub enum DbError {
    /// The pool could not be created or the store is unreachable
    #[error("database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    /// Applying the embedded migrations failed
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Opens the pool and brings the schema up to date.
///
/// This is what the server runs at startup so the three tables always
/// exist before the first request is served.
pub async fn connect_and_migrate(config: pool::DatabaseConfig) -> Result<SqlitePool, DbError> {
    let pool = pool::create_pool(config).await?;
    migrations::run_migrations(&pool).await?;
    Ok(pool)
}
