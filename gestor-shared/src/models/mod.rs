/// Database models for the task manager
///
/// This module contains the three entities and their CRUD operations.
/// Relations are plain foreign-key ids; populated views (`TaskDetail`,
/// `CategoryWithTasks`, `UserWithTasks`) are assembled at query time and
/// never nest back into each other.
///
/// # Models
///
/// - `category`: Named groupings for tasks
/// - `user`: People tasks are assigned to
/// - `task`: To-do items referencing one category and one user
///
/// # Example
///
/// ```no_run
/// use gestor_shared::models::category::{Category, CreateCategory};
/// use gestor_shared::models::task::{CreateTask, Task};
/// use gestor_shared::models::user::{CreateUser, User};
/// use gestor_shared::db::{self, pool::DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = db::connect_and_migrate(DatabaseConfig::in_memory()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     name: "Ana".to_string(),
///     email: "ana@x.com".to_string(),
/// }).await?;
/// let category = Category::create(&pool, CreateCategory {
///     name: "Work".to_string(),
/// }).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     title: "Write report".to_string(),
///     description: String::new(),
///     status: None,
///     created_at: None,
///     category_id: category.id,
///     user_id: user.id,
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod category;
pub mod task;
pub mod user;
