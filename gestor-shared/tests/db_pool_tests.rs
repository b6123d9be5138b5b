/// Integration tests for the database connection pool
///
/// In-memory pools need no external setup. The file-backed tests create a
/// throwaway database under the system temp directory.

use gestor_shared::db::pool::{close_pool, create_pool, get_pool_stats, health_check, DatabaseConfig};
use std::path::PathBuf;

/// Unique database file path for one test
fn temp_database_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "gestor_{}_{}_{}.db",
        name,
        std::process::id(),
        chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
    ))
}

fn remove_database_files(path: &PathBuf) {
    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.clone().into_os_string();
        file.push(suffix);
        std::fs::remove_file(file).ok();
    }
}

#[tokio::test]
async fn test_create_pool_in_memory() {
    let pool = create_pool(DatabaseConfig::in_memory())
        .await
        .expect("Failed to create pool");

    let stats = get_pool_stats(&pool);
    assert!(stats.total_connections > 0, "Pool should have at least one connection");

    close_pool(pool).await;
}

#[tokio::test]
async fn test_create_pool_creates_missing_file() {
    let path = temp_database_path("create");
    assert!(!path.exists());

    let config = DatabaseConfig {
        url: format!("sqlite:{}", path.display()),
        max_connections: 2,
        ..Default::default()
    };

    let pool = create_pool(config).await.expect("Failed to create pool");
    assert!(path.exists(), "Database file should have been created");

    close_pool(pool).await;
    remove_database_files(&path);
}

#[tokio::test]
async fn test_create_pool_with_unreachable_path() {
    let config = DatabaseConfig {
        url: "sqlite:/nonexistent-gestor-dir/nested/gestor.db".to_string(),
        connect_timeout_seconds: 2,
        ..Default::default()
    };

    let result = create_pool(config).await;
    assert!(result.is_err(), "Should fail when the directory does not exist");
}

#[tokio::test]
async fn test_health_check_success() {
    let pool = create_pool(DatabaseConfig::in_memory())
        .await
        .expect("Failed to create pool");

    let result = health_check(&pool).await;
    assert!(result.is_ok(), "Health check should succeed");

    close_pool(pool).await;
}

#[tokio::test]
async fn test_pool_query_execution() {
    let pool = create_pool(DatabaseConfig::in_memory())
        .await
        .expect("Failed to create pool");

    let row: (i64,) = sqlx::query_as("SELECT ?")
        .bind(42i64)
        .fetch_one(&pool)
        .await
        .expect("Failed to execute query");

    assert_eq!(row.0, 42);

    close_pool(pool).await;
}

#[tokio::test]
async fn test_in_memory_database_survives_between_queries() {
    let pool = create_pool(DatabaseConfig::in_memory())
        .await
        .expect("Failed to create pool");

    sqlx::query("CREATE TABLE scratch (value INTEGER NOT NULL)")
        .execute(&pool)
        .await
        .expect("Failed to create table");
    sqlx::query("INSERT INTO scratch (value) VALUES (1), (2)")
        .execute(&pool)
        .await
        .expect("Failed to insert");

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM scratch")
        .fetch_one(&pool)
        .await
        .expect("Failed to count");
    assert_eq!(count, 2);

    close_pool(pool).await;
}

#[tokio::test]
async fn test_foreign_keys_enabled() {
    let pool = create_pool(DatabaseConfig::in_memory())
        .await
        .expect("Failed to create pool");

    let (enabled,): (i64,) = sqlx::query_as("PRAGMA foreign_keys")
        .fetch_one(&pool)
        .await
        .expect("Failed to read pragma");
    assert_eq!(enabled, 1, "Foreign keys must be enforced");

    close_pool(pool).await;
}

#[tokio::test]
async fn test_pool_concurrent_queries() {
    let path = temp_database_path("concurrent");
    let config = DatabaseConfig {
        url: format!("sqlite:{}", path.display()),
        max_connections: 4,
        ..Default::default()
    };

    let pool = create_pool(config).await.expect("Failed to create pool");

    // More tasks than connections to exercise queueing
    let mut handles = vec![];
    for i in 0..20i64 {
        let pool_clone = pool.clone();
        handles.push(tokio::spawn(async move {
            let row: (i64,) = sqlx::query_as("SELECT ?")
                .bind(i)
                .fetch_one(&pool_clone)
                .await
                .expect("Failed to execute query");

            assert_eq!(row.0, i);
        }));
    }

    for handle in handles {
        handle.await.expect("Task panicked");
    }

    let stats = get_pool_stats(&pool);
    assert!(stats.total_connections <= 4, "Should not exceed max_connections");

    close_pool(pool).await;
    remove_database_files(&path);
}

#[tokio::test]
async fn test_get_pool_stats_with_active_connection() {
    let pool = create_pool(DatabaseConfig::in_memory())
        .await
        .expect("Failed to create pool");

    let conn = pool.acquire().await.expect("Failed to acquire connection");

    let stats = get_pool_stats(&pool);
    assert_eq!(stats.active_connections, 1);
    assert_eq!(stats.idle_connections, 0);

    drop(conn);
    close_pool(pool).await;
}
