/// Category endpoints
///
/// # Endpoints
///
/// - `GET    /api/categoria/listar` - List categories with their tasks
/// - `POST   /api/categoria/cadastrar` - Create category
/// - `GET    /api/categoria/:id` - Get category with its tasks
/// - `GET    /api/categoria/buscar/:nome` - Find category by exact name
/// - `PATCH  /api/categoria/:id` - Rename category (also `PUT`)
/// - `DELETE /api/categoria/:id` - Delete category without tasks

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath},
    routes::{created, Created},
    validation::{non_blank, not_blank},
};
use axum::{extract::State, Json};
use gestor_shared::models::category::{Category, CategoryWithTasks, CreateCategory, UpdateCategory};
use serde::Deserialize;
use tracing::{info, warn};
use validator::Validate;

/// Create category request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[serde(default, alias = "nome")]
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,
}

/// Partial category update
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCategoryRequest {
    /// New name; blank or missing leaves the name unchanged
    #[serde(default, alias = "nome")]
    pub name: Option<String>,
}

fn category_not_found() -> ApiError {
    ApiError::NotFound("Category not found".to_string())
}

/// List categories
///
/// # Errors
///
/// - `404 Not Found`: No category exists yet
pub async fn list_categories(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<CategoryWithTasks>>> {
    let categories = Category::list_with_tasks(&state.db).await?;

    if categories.is_empty() {
        return Err(ApiError::NotFound("No categories found".to_string()));
    }

    Ok(Json(categories))
}

/// Create category
///
/// # Endpoint
///
/// ```text
/// POST /api/categoria/cadastrar
/// Content-Type: application/json
///
/// { "name": "Work" }
/// ```
///
/// # Response
///
/// `201 Created` with `Location: /api/categoria/{id}`:
///
/// ```json
/// { "id": 1, "name": "Work" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Blank name
/// - `409 Conflict`: A category with this name exists
pub async fn create_category(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateCategoryRequest>,
) -> ApiResult<Created<Category>> {
    req.validate()?;

    info!(name = %req.name, "Creating category");

    if Category::find_by_name(&state.db, &req.name).await?.is_some() {
        warn!(name = %req.name, "Category already exists");
        return Err(ApiError::Conflict("Category already exists".to_string()));
    }

    let category = Category::create(&state.db, CreateCategory { name: req.name }).await?;

    info!(category_id = category.id, "Category created");
    Ok(created(format!("/api/categoria/{}", category.id), category))
}

/// Get category by id, with its tasks
///
/// # Errors
///
/// - `404 Not Found`: No category with this id
pub async fn get_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<CategoryWithTasks>> {
    let category = Category::find_by_id(&state.db, id)
        .await?
        .ok_or_else(category_not_found)?;

    Ok(Json(category.with_tasks(&state.db).await?))
}

/// Find category by exact name, with its tasks
///
/// # Errors
///
/// - `404 Not Found`: No category with this name
pub async fn find_category_by_name(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
) -> ApiResult<Json<CategoryWithTasks>> {
    let category = Category::find_by_name(&state.db, &name)
        .await?
        .ok_or_else(category_not_found)?;

    Ok(Json(category.with_tasks(&state.db).await?))
}

/// Update category
///
/// A blank or missing name leaves the category untouched.
///
/// # Errors
///
/// - `404 Not Found`: No category with this id
/// - `409 Conflict`: Another category already has the new name
pub async fn update_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateCategoryRequest>,
) -> ApiResult<Json<Category>> {
    let existing = Category::find_by_id(&state.db, id)
        .await?
        .ok_or_else(category_not_found)?;

    let name = non_blank(req.name).filter(|name| *name != existing.name);

    if let Some(name) = &name {
        if let Some(other) = Category::find_by_name(&state.db, name).await? {
            warn!(category_id = id, other_id = other.id, "Category name already taken");
            return Err(ApiError::Conflict("Category already exists".to_string()));
        }
    }

    let category = Category::update(&state.db, id, UpdateCategory { name })
        .await?
        .ok_or_else(category_not_found)?;

    Ok(Json(category))
}

/// Delete category
///
/// Returns the removed category.
///
/// # Errors
///
/// - `404 Not Found`: No category with this id
/// - `409 Conflict`: Tasks are still assigned to the category
pub async fn delete_category(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Category>> {
    if Category::find_by_id(&state.db, id).await?.is_none() {
        return Err(category_not_found());
    }

    let task_count = Category::task_count(&state.db, id).await?;
    if task_count > 0 {
        warn!(category_id = id, task_count, "Refusing to delete category with tasks");
        return Err(ApiError::Conflict(format!(
            "Category still has {} task(s) assigned",
            task_count
        )));
    }

    let category = Category::delete(&state.db, id)
        .await?
        .ok_or_else(category_not_found)?;

    info!(category_id = id, "Category deleted");
    Ok(Json(category))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_accepts_portuguese_key() {
        let req: CreateCategoryRequest = serde_json::from_str(r#"{"nome":"Trabalho"}"#).unwrap();
        assert_eq!(req.name, "Trabalho");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_request_requires_name() {
        let req: CreateCategoryRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_err());

        let req: CreateCategoryRequest = serde_json::from_str(r#"{"name":"   "}"#).unwrap();
        assert!(req.validate().is_err());
    }
}
