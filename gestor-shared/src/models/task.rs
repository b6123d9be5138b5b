/// Task model and database operations
///
/// A task is a to-do item owned by a user and classified by a category.
/// Both relations are stored as foreign-key ids; the populated form
/// (`TaskDetail`) is produced by a join at query time so serialized output
/// never loops back from a category or user to its tasks.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id          INTEGER PRIMARY KEY AUTOINCREMENT,
///     title       TEXT NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     status      TEXT NOT NULL DEFAULT 'Pending',
///     created_at  TEXT NOT NULL,
///     category_id INTEGER NOT NULL REFERENCES categories(id) ON DELETE RESTRICT,
///     user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE RESTRICT
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use gestor_shared::models::task::{CreateTask, Task};
/// use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool) -> Result<(), sqlx::Error> {
/// let task = Task::create(&pool, CreateTask {
///     title: "Write report".to_string(),
///     description: String::new(),
///     status: None,
///     created_at: None,
///     category_id: 1,
///     user_id: 1,
/// }).await?;
///
/// assert_eq!(task.status, "Pending");
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{category::Category, user::User};

/// Status given to tasks created without one
pub const DEFAULT_STATUS: &str = "Pending";

const TASK_COLUMNS: &str = "id, title, description, status, created_at, category_id, user_id";

const DETAIL_SELECT: &str = r#"
    SELECT t.id, t.title, t.description, t.status, t.created_at,
           t.category_id, t.user_id,
           c.name AS category_name,
           u.name AS user_name, u.email AS user_email
    FROM tasks t
    JOIN categories c ON c.id = t.category_id
    JOIN users u ON u.id = t.user_id
"#;

/// Task row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Store-assigned id
    pub id: i64,

    pub title: String,

    pub description: String,

    /// Free-text status, "Pending" unless the client chose otherwise
    pub status: String,

    pub created_at: DateTime<Utc>,

    pub category_id: i64,

    pub user_id: i64,
}

/// Task with its category and user populated
///
/// The embedded category and user carry no task lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Task,

    pub category: Category,

    pub user: User,
}

#[derive(sqlx::FromRow)]
struct TaskDetailRow {
    id: i64,
    title: String,
    description: String,
    status: String,
    created_at: DateTime<Utc>,
    category_id: i64,
    user_id: i64,
    category_name: String,
    user_name: String,
    user_email: String,
}

impl From<TaskDetailRow> for TaskDetail {
    fn from(row: TaskDetailRow) -> Self {
        TaskDetail {
            category: Category {
                id: row.category_id,
                name: row.category_name,
            },
            user: User {
                id: row.user_id,
                name: row.user_name,
                email: row.user_email,
            },
            task: Task {
                id: row.id,
                title: row.title,
                description: row.description,
                status: row.status,
                created_at: row.created_at,
                category_id: row.category_id,
                user_id: row.user_id,
            },
        }
    }
}

/// Input for creating a new task
///
/// `status` falls back to [`DEFAULT_STATUS`] and `created_at` to the
/// current time when not given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub category_id: i64,
    pub user_id: i64,
}

/// Input for updating an existing task
///
/// All fields are optional. Only `Some` fields are written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub category_id: Option<i64>,
    pub user_id: Option<i64>,
}

impl UpdateTask {
    /// True when no field would be written
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.category_id.is_none()
            && self.user_id.is_none()
    }
}

impl Task {
    /// Inserts a new task and returns it with its assigned id
    ///
    /// The referenced category and user are not checked here; callers
    /// validate them first. A dangling reference that slips through is
    /// still rejected by the foreign-key constraint.
    pub async fn create(pool: &SqlitePool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let status = data
            .status
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STATUS.to_string());
        let created_at = data.created_at.unwrap_or_else(Utc::now);

        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (title, description, status, created_at, category_id, user_id)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(data.title)
        .bind(data.description)
        .bind(status)
        .bind(created_at)
        .bind(data.category_id)
        .bind(data.user_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by id
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a task by id with its category and user populated
    pub async fn find_detail_by_id(
        pool: &SqlitePool,
        id: i64,
    ) -> Result<Option<TaskDetail>, sqlx::Error> {
        let row = sqlx::query_as::<_, TaskDetailRow>(&format!("{DETAIL_SELECT} WHERE t.id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(TaskDetail::from))
    }

    /// Finds the first task whose title matches exactly, relations populated
    pub async fn find_by_title(
        pool: &SqlitePool,
        title: &str,
    ) -> Result<Option<TaskDetail>, sqlx::Error> {
        let row = sqlx::query_as::<_, TaskDetailRow>(&format!(
            "{DETAIL_SELECT} WHERE t.title = ? ORDER BY t.id LIMIT 1"
        ))
        .bind(title)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(TaskDetail::from))
    }

    /// Whether a task with this exact title exists, optionally ignoring one id
    pub async fn title_exists(
        pool: &SqlitePool,
        title: &str,
        except_id: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM tasks WHERE title = ? AND id IS NOT ?)",
        )
        .bind(title)
        .bind(except_id)
        .fetch_one(pool)
        .await
    }

    /// Lists every task with category and user populated, ordered by id
    pub async fn list_detailed(pool: &SqlitePool) -> Result<Vec<TaskDetail>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TaskDetailRow>(&format!("{DETAIL_SELECT} ORDER BY t.id"))
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(TaskDetail::from).collect())
    }

    /// Lists every task as plain rows, ordered by id
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!("SELECT {TASK_COLUMNS} FROM tasks ORDER BY id"))
            .fetch_all(pool)
            .await
    }

    /// Tasks assigned to a category
    pub async fn list_by_category(
        pool: &SqlitePool,
        category_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE category_id = ? ORDER BY id"
        ))
        .bind(category_id)
        .fetch_all(pool)
        .await
    }

    /// Tasks assigned to a user
    pub async fn list_by_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ? ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Updates an existing task
    ///
    /// Only `Some` fields in `data` are written. Returns None if the task
    /// doesn't exist.
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        if data.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE tasks SET ");
        let mut fields = query.separated(", ");

        if let Some(title) = data.title {
            fields.push("title = ").push_bind_unseparated(title);
        }
        if let Some(description) = data.description {
            fields.push("description = ").push_bind_unseparated(description);
        }
        if let Some(status) = data.status {
            fields.push("status = ").push_bind_unseparated(status);
        }
        if let Some(category_id) = data.category_id {
            fields.push("category_id = ").push_bind_unseparated(category_id);
        }
        if let Some(user_id) = data.user_id {
            fields.push("user_id = ").push_bind_unseparated(user_id);
        }

        query.push(" WHERE id = ").push_bind(id);
        query.push(" RETURNING ").push(TASK_COLUMNS);

        query.build_query_as::<Task>().fetch_optional(pool).await
    }

    /// Deletes a task by id, returning the removed row
    ///
    /// Returns None if the task didn't exist.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "DELETE FROM tasks WHERE id = ? RETURNING {TASK_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Counts total number of tasks
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
