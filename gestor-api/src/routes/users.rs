/// User endpoints
///
/// # Endpoints
///
/// - `GET    /api/usuario/listar` - List users
/// - `POST   /api/usuario/cadastrar` - Create user
/// - `GET    /api/usuario/:id` - Get user with assigned tasks
/// - `GET    /api/usuario/buscar/:nome` - Find user by exact name
/// - `PATCH  /api/usuario/:id` - Partially update name/email
/// - `DELETE /api/usuario/:id` - Delete user without tasks

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{ApiJson, ApiPath},
    routes::{created, Created},
    validation::{non_blank, not_blank},
};
use axum::{extract::State, Json};
use gestor_shared::models::user::{CreateUser, UpdateUser, User, UserWithTasks};
use serde::Deserialize;
use tracing::{info, warn};
use validator::{Validate, ValidateEmail};

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[serde(default, alias = "nome")]
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,

    /// Must be unique across users
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Partial user update
///
/// Blank or missing fields leave the stored value unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default, alias = "nome")]
    pub name: Option<String>,

    #[serde(default)]
    pub email: Option<String>,
}

fn user_not_found() -> ApiError {
    ApiError::NotFound("User not found".to_string())
}

/// List users
///
/// Task lists are not included; use `GET /api/usuario/:id` for those.
///
/// # Errors
///
/// - `404 Not Found`: No user exists yet
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    let users = User::list(&state.db).await?;

    if users.is_empty() {
        return Err(ApiError::NotFound("No users found".to_string()));
    }

    Ok(Json(users))
}

/// Create user
///
/// # Endpoint
///
/// ```text
/// POST /api/usuario/cadastrar
/// Content-Type: application/json
///
/// { "name": "Ana", "email": "ana@x.com" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Blank name, blank or malformed email
/// - `409 Conflict`: Email already registered
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> ApiResult<Created<User>> {
    req.validate()?;

    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        warn!(email = %req.email, "User already registered");
        return Err(ApiError::Conflict("User already registered".to_string()));
    }

    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            email: req.email,
        },
    )
    .await?;

    info!(user_id = user.id, "User created");
    Ok(created(format!("/api/usuario/{}", user.id), user))
}

/// Get user by id, with assigned tasks
///
/// # Errors
///
/// - `404 Not Found`: No user with this id
pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<UserWithTasks>> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(user_not_found)?;

    Ok(Json(user.with_tasks(&state.db).await?))
}

/// Find the first user with this exact name
///
/// # Errors
///
/// - `404 Not Found`: No user with this name
pub async fn find_user_by_name(
    State(state): State<AppState>,
    ApiPath(name): ApiPath<String>,
) -> ApiResult<Json<User>> {
    let user = User::find_by_name(&state.db, &name)
        .await?
        .ok_or_else(user_not_found)?;

    Ok(Json(user))
}

/// Update user
///
/// # Errors
///
/// - `400 Bad Request`: New email is malformed
/// - `404 Not Found`: No user with this id
/// - `409 Conflict`: New email belongs to another user
pub async fn update_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    let existing = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(user_not_found)?;

    let name = non_blank(req.name);
    let email = non_blank(req.email).filter(|email| *email != existing.email);

    if let Some(email) = &email {
        if !email.validate_email() {
            return Err(ApiError::invalid_field("email", "Invalid email format"));
        }
        if User::find_by_email(&state.db, email).await?.is_some() {
            warn!(user_id = id, "Email already registered to another user");
            return Err(ApiError::Conflict("User already registered".to_string()));
        }
    }

    let user = User::update(&state.db, id, UpdateUser { name, email })
        .await?
        .ok_or_else(user_not_found)?;

    Ok(Json(user))
}

/// Delete user
///
/// Returns the removed user.
///
/// # Errors
///
/// - `404 Not Found`: No user with this id
/// - `409 Conflict`: Tasks are still assigned to the user
pub async fn delete_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<User>> {
    if User::find_by_id(&state.db, id).await?.is_none() {
        return Err(user_not_found());
    }

    let task_count = User::task_count(&state.db, id).await?;
    if task_count > 0 {
        warn!(user_id = id, task_count, "Refusing to delete user with tasks");
        return Err(ApiError::Conflict(format!(
            "User still has {} task(s) assigned",
            task_count
        )));
    }

    let user = User::delete(&state.db, id)
        .await?
        .ok_or_else(user_not_found)?;

    info!(user_id = id, "User deleted");
    Ok(Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_validation() {
        let ok: CreateUserRequest =
            serde_json::from_str(r#"{"nome":"Ana","email":"ana@x.com"}"#).unwrap();
        assert!(ok.validate().is_ok());

        let missing_email: CreateUserRequest = serde_json::from_str(r#"{"name":"Ana"}"#).unwrap();
        assert!(missing_email.validate().is_err());

        let bad_email: CreateUserRequest =
            serde_json::from_str(r#"{"name":"Ana","email":"not-an-email"}"#).unwrap();
        let errors = bad_email.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));

        let blank_name: CreateUserRequest =
            serde_json::from_str(r#"{"name":" ","email":"ana@x.com"}"#).unwrap();
        assert!(blank_name.validate().unwrap_err().field_errors().contains_key("name"));
    }
}
