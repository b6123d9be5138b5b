/// Category model and database operations
///
/// Categories are named groupings for tasks. Names are unique. The list of
/// tasks in a category is derived by query and never stored on the row.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE categories (
///     id   INTEGER PRIMARY KEY AUTOINCREMENT,
///     name TEXT NOT NULL UNIQUE
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use gestor_shared::models::category::{Category, CreateCategory};
/// use sqlx::SqlitePool;
///
/// # async fn example(pool: SqlitePool) -> Result<(), sqlx::Error> {
/// let work = Category::create(&pool, CreateCategory {
///     name: "Work".to_string(),
/// }).await?;
///
/// let with_tasks = work.with_tasks(&pool).await?;
/// println!("{} has {} tasks", with_tasks.category.name, with_tasks.tasks.len());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::HashMap;

use super::task::Task;

/// Category row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,

    /// Unique across all categories; serialized as `nome`, the key the web forms read
    #[serde(rename = "nome", alias = "name")]
    pub name: String,
}

/// Category with the tasks assigned to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryWithTasks {
    #[serde(flatten)]
    pub category: Category,

    pub tasks: Vec<Task>,
}

/// Input for creating a new category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategory {
    pub name: String,
}

/// Input for updating an existing category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCategory {
    /// New name, left unchanged when None
    pub name: Option<String>,
}

impl Category {
    /// Creates a new category
    ///
    /// # Errors
    ///
    /// Returns a unique-violation database error if the name is taken.
    pub async fn create(pool: &SqlitePool, data: CreateCategory) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name) VALUES (?) RETURNING id, name",
        )
        .bind(data.name)
        .fetch_one(pool)
        .await
    }

    /// Finds a category by id
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a category by its exact name
    pub async fn find_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE name = ?")
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Lists all categories ordered by id
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// Lists all categories, each with its tasks
    ///
    /// Two queries regardless of the number of categories.
    pub async fn list_with_tasks(pool: &SqlitePool) -> Result<Vec<CategoryWithTasks>, sqlx::Error> {
        let categories = Self::list(pool).await?;
        let mut by_category: HashMap<i64, Vec<Task>> = HashMap::new();
        for task in Task::list(pool).await? {
            by_category.entry(task.category_id).or_default().push(task);
        }

        Ok(categories
            .into_iter()
            .map(|category| CategoryWithTasks {
                tasks: by_category.remove(&category.id).unwrap_or_default(),
                category,
            })
            .collect())
    }

    /// Loads the tasks assigned to this category
    pub async fn with_tasks(self, pool: &SqlitePool) -> Result<CategoryWithTasks, sqlx::Error> {
        let tasks = Task::list_by_category(pool, self.id).await?;
        Ok(CategoryWithTasks {
            category: self,
            tasks,
        })
    }

    /// Updates an existing category
    ///
    /// Returns None if the category doesn't exist.
    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        data: UpdateCategory,
    ) -> Result<Option<Self>, sqlx::Error> {
        let Some(name) = data.name else {
            return Self::find_by_id(pool, id).await;
        };

        sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = ? WHERE id = ? RETURNING id, name",
        )
        .bind(name)
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a category, returning the removed row
    ///
    /// Returns None if the category didn't exist.
    ///
    /// # Errors
    ///
    /// Returns a foreign-key database error if tasks still reference it.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Category>("DELETE FROM categories WHERE id = ? RETURNING id, name")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Number of tasks assigned to a category
    pub async fn task_count(pool: &SqlitePool, id: i64) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE category_id = ?")
            .bind(id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Counts total number of categories
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
