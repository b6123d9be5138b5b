/// User model and database operations
///
/// Users are the people tasks are assigned to. Email addresses are unique;
/// names are not.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id    INTEGER PRIMARY KEY AUTOINCREMENT,
///     name  TEXT NOT NULL,
///     email TEXT NOT NULL UNIQUE
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use gestor_shared::models::user::{CreateUser, User};
/// use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool) -> Result<(), sqlx::Error> {
/// let ana = User::create(&pool, CreateUser {
///     name: "Ana".to_string(),
///     email: "ana@x.com".to_string(),
/// }).await?;
///
/// let found = User::find_by_email(&pool, "ana@x.com").await?;
/// assert_eq!(found.map(|u| u.id), Some(ana.id));
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::task::Task;

/// User row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,

    /// Serialized as `nome`, the key the web forms read
    #[serde(rename = "nome", alias = "name")]
    pub name: String,

    /// Unique across all users
    pub email: String,
}

/// User with the tasks assigned to them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserWithTasks {
    #[serde(flatten)]
    pub user: User,

    pub tasks: Vec<Task>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
}

/// Input for updating an existing user
///
/// All fields are optional. Only non-None fields will be updated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns a unique-violation database error if the email is taken.
    pub async fn create(pool: &SqlitePool, data: CreateUser) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email)
            VALUES (?, ?)
            RETURNING id, name, email
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .fetch_one(pool)
        .await
    }

    /// Finds a user by id
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT id, name, email FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a user by email address (exact match)
    pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT id, name, email FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Finds the first user with this exact name
    ///
    /// Names are not unique; the lowest id wins.
    pub async fn find_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email FROM users WHERE name = ? ORDER BY id LIMIT 1",
        )
        .bind(name)
        .fetch_optional(pool)
        .await
    }

    /// Lists all users ordered by id
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT id, name, email FROM users ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// Loads the tasks assigned to this user
    pub async fn with_tasks(self, pool: &SqlitePool) -> Result<UserWithTasks, sqlx::Error> {
        let tasks = Task::list_by_user(pool, self.id).await?;
        Ok(UserWithTasks { user: self, tasks })
    }

    /// Updates an existing user
    ///
    /// Only non-None fields in `data` will be updated. Returns None if the
    /// user doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns a unique-violation database error if the new email belongs
    /// to another user.
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: UpdateUser,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE(?, name),
                email = COALESCE(?, email)
            WHERE id = ?
            RETURNING id, name, email
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a user, returning the removed row
    ///
    /// Returns None if the user didn't exist.
    ///
    /// # Errors
    ///
    /// Returns a foreign-key database error if tasks are still assigned.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>("DELETE FROM users WHERE id = ? RETURNING id, name, email")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Number of tasks assigned to a user
    pub async fn task_count(pool: &SqlitePool, id: i64) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE user_id = ?")
            .bind(id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Counts total number of users
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_user_default() {
        let update = UpdateUser::default();
        assert!(update.name.is_none());
        assert!(update.email.is_none());
    }

    #[test]
    fn test_user_with_tasks_serializes_flat() {
        let value = serde_json::to_value(UserWithTasks {
            user: User {
                id: 4,
                name: "Ana".to_string(),
                email: "ana@x.com".to_string(),
            },
            tasks: vec![],
        })
        .unwrap();

        assert_eq!(value["id"], 4);
        assert_eq!(value["nome"], "Ana");
        assert!(value.get("name").is_none());
        assert_eq!(value["email"], "ana@x.com");
        assert!(value["tasks"].as_array().unwrap().is_empty());
    }
}
