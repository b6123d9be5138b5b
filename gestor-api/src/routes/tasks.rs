/// Task endpoints
///
/// Every task response carries its category and user:
///
/// ```json
/// {
///   "id": 1,
///   "title": "Write report",
///   "description": "",
///   "status": "Pending",
///   "createdAt": "2025-10-19T15:10:10Z",
///   "categoryId": 1,
///   "userId": 1,
///   "category": { "id": 1, "name": "Work" },
///   "user": { "id": 1, "name": "Ana", "email": "ana@x.com" }
/// }
/// ```
///
/// # Endpoints
///
/// - `GET    /api/tarefa/listar` - List tasks
/// - `POST   /api/tarefa/cadastrar` - Create task
/// - `GET    /api/tarefa/buscar/:titulo` - Find task by exact title
/// - `GET    /api/tarefa/:id` - Get task
/// - `PATCH  /api/tarefa/:id` - Partially update task
/// - `DELETE /api/tarefa/:id` - Delete task

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath},
    routes::{created, Created},
    validation::{non_blank, not_blank},
};
use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use gestor_shared::models::{
    category::Category,
    task::{CreateTask, Task, TaskDetail, UpdateTask},
    user::User,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::{info, warn};
use validator::Validate;

/// Create task request
///
/// `status` defaults to "Pending" and `createdAt` to the current time.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(default, alias = "titulo")]
    #[validate(custom(function = "not_blank", message = "Title is required"))]
    pub title: String,

    #[serde(default, alias = "descricao")]
    pub description: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default, alias = "criadoEm")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, alias = "categoriaId")]
    pub category_id: i64,

    #[serde(default, alias = "usuarioId")]
    pub user_id: i64,
}

/// Partial task update
///
/// Blank text fields are ignored. A `categoryId`/`userId` of 0 means
/// "unchanged", matching what the web forms send for an empty select.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[serde(default, alias = "titulo")]
    pub title: Option<String>,

    #[serde(default, alias = "descricao")]
    pub description: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default, alias = "categoriaId")]
    pub category_id: Option<i64>,

    #[serde(default, alias = "usuarioId")]
    pub user_id: Option<i64>,
}

fn task_not_found() -> ApiError {
    ApiError::NotFound("Task not found".to_string())
}

fn title_taken() -> ApiError {
    ApiError::Conflict("A task with this title already exists".to_string())
}

async fn require_category(db: &SqlitePool, id: i64) -> ApiResult<Category> {
    Category::find_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::BadRequest(format!("Category with id {} not found", id)))
}

async fn require_user(db: &SqlitePool, id: i64) -> ApiResult<User> {
    User::find_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::BadRequest(format!("User with id {} not found", id)))
}

/// List tasks with category and user populated
///
/// # Errors
///
/// - `404 Not Found`: No task exists
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<TaskDetail>>> {
    let tasks = Task::list_detailed(&state.db).await?;

    if tasks.is_empty() {
        return Err(ApiError::NotFound("No tasks found".to_string()));
    }

    Ok(Json(tasks))
}

/// Create task
///
/// # Endpoint
///
/// ```text
/// POST /api/tarefa/cadastrar
/// Content-Type: application/json
///
/// { "title": "Write report", "categoryId": 1, "userId": 1 }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Blank title, or the category/user does not exist
/// - `409 Conflict`: A task with this title exists
pub async fn create_task(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateTaskRequest>,
) -> ApiResult<Created<TaskDetail>> {
    req.validate()?;

    if Task::title_exists(&state.db, &req.title, None).await? {
        warn!(title = %req.title, "Task title already exists");
        return Err(title_taken());
    }

    let category = require_category(&state.db, req.category_id).await?;
    let user = require_user(&state.db, req.user_id).await?;

    let task = Task::create(
        &state.db,
        CreateTask {
            title: req.title,
            description: req.description.unwrap_or_default(),
            status: req.status,
            created_at: req.created_at,
            category_id: category.id,
            user_id: user.id,
        },
    )
    .await?;

    info!(task_id = task.id, category_id = category.id, user_id = user.id, "Task created");
    Ok(created(
        format!("/api/tarefa/{}", task.id),
        TaskDetail {
            task,
            category,
            user,
        },
    ))
}

/// Find task by exact title
///
/// # Errors
///
/// - `404 Not Found`: No task with this title
pub async fn find_task_by_title(
    State(state): State<AppState>,
    ApiPath(title): ApiPath<String>,
) -> ApiResult<Json<TaskDetail>> {
    let task = Task::find_by_title(&state.db, &title)
        .await?
        .ok_or_else(task_not_found)?;

    Ok(Json(task))
}

/// Get task by id
///
/// # Errors
///
/// - `404 Not Found`: No task with this id
pub async fn get_task(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<TaskDetail>> {
    let task = Task::find_detail_by_id(&state.db, id)
        .await?
        .ok_or_else(task_not_found)?;

    Ok(Json(task))
}

/// Update task
///
/// Changing the category or user re-checks that the new one exists.
///
/// # Errors
///
/// - `400 Bad Request`: New category/user does not exist
/// - `404 Not Found`: No task with this id
/// - `409 Conflict`: New title belongs to another task
pub async fn update_task(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateTaskRequest>,
) -> ApiResult<Json<TaskDetail>> {
    let existing = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(task_not_found)?;

    let title = non_blank(req.title).filter(|title| *title != existing.title);
    if let Some(title) = &title {
        if Task::title_exists(&state.db, title, Some(id)).await? {
            warn!(task_id = id, "Task title already exists");
            return Err(title_taken());
        }
    }

    let category_id = match req.category_id {
        Some(category_id) if category_id != 0 && category_id != existing.category_id => {
            Some(require_category(&state.db, category_id).await?.id)
        }
        _ => None,
    };

    let user_id = match req.user_id {
        Some(user_id) if user_id != 0 && user_id != existing.user_id => {
            Some(require_user(&state.db, user_id).await?.id)
        }
        _ => None,
    };

    Task::update(
        &state.db,
        id,
        UpdateTask {
            title,
            description: non_blank(req.description),
            status: non_blank(req.status),
            category_id,
            user_id,
        },
    )
    .await?
    .ok_or_else(task_not_found)?;

    let task = Task::find_detail_by_id(&state.db, id)
        .await?
        .ok_or_else(task_not_found)?;

    Ok(Json(task))
}

/// Delete task
///
/// Returns the removed task with its category and user.
///
/// # Errors
///
/// - `404 Not Found`: No task with this id
pub async fn delete_task(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<TaskDetail>> {
    let task = Task::find_detail_by_id(&state.db, id)
        .await?
        .ok_or_else(task_not_found)?;

    Task::delete(&state.db, id)
        .await?
        .ok_or_else(task_not_found)?;

    info!(task_id = id, "Task deleted");
    Ok(Json(task))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_accepts_front_end_payload() {
        let req: CreateTaskRequest = serde_json::from_str(
            r#"{"titulo":"Relatorio","descricao":"mensal","categoriaId":2,"usuarioId":3}"#,
        )
        .unwrap();

        assert_eq!(req.title, "Relatorio");
        assert_eq!(req.description.as_deref(), Some("mensal"));
        assert_eq!(req.category_id, 2);
        assert_eq!(req.user_id, 3);
        assert!(req.status.is_none());
        assert!(req.created_at.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_request_requires_title() {
        let req: CreateTaskRequest =
            serde_json::from_str(r#"{"title":"","categoryId":1,"userId":1}"#).unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));
    }

    #[test]
    fn test_update_request_fields_are_optional() {
        let req: UpdateTaskRequest = serde_json::from_str(r#"{"status":"Done"}"#).unwrap();
        assert_eq!(req.status.as_deref(), Some("Done"));
        assert!(req.title.is_none());
        assert!(req.category_id.is_none());
    }
}
