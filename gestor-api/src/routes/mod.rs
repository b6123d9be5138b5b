/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Banner and health check endpoints
/// - `categories`: `/api/categoria/*`
/// - `users`: `/api/usuario/*`
/// - `tasks`: `/api/tarefa/*`

pub mod categories;
pub mod health;
pub mod tasks;
pub mod users;

use crate::error::ApiError;
use axum::{
    http::{header, HeaderName, StatusCode},
    Json,
};

/// Response of the insert endpoints: 201, `Location` header and the new record
pub type Created<T> = (StatusCode, [(HeaderName, String); 1], Json<T>);

pub(crate) fn created<T>(location: String, body: T) -> Created<T> {
    (StatusCode::CREATED, [(header::LOCATION, location)], Json(body))
}

/// Fallback for paths no route matches
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
