/// Request extractors with JSON error bodies
///
/// Axum's stock `Json` and `Path` extractors answer malformed input with a
/// plain-text rejection. These wrappers route the rejection through
/// [`ApiError`] so every failure has the same JSON shape.

use crate::error::ApiError;
use axum::extract::{FromRequest, FromRequestParts};

/// `Json<T>` whose rejection is an [`ApiError::BadRequest`]
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// `Path<T>` whose rejection is an [`ApiError::BadRequest`]
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
