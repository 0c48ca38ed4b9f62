//! User Routes
//!
//! The `/users` contract the credential client talks to.
//!
//! - POST /users - Register an account
//! - GET /users - List accounts matching the query string
//! - GET /users/:id - Get one account
//! - DELETE /users/:id - Delete an account

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{CreateUserRequest, StoredUser, UserQuery};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;

/// POST /users
///
/// Register an account. 409 if the email is taken.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<StoredUser>)> {
    let missing = req.missing_fields();
    if !missing.is_empty() {
        return Err(ApiError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    let user = state.users.create(req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /users?email=&password=
///
/// Every account matching all supplied parameters; empty when none do.
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> Json<Vec<StoredUser>> {
    Json(state.users.find(&query).await)
}

/// GET /users/:id
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<StoredUser>> {
    state
        .users
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("User with id {} not found", id)))
}

/// DELETE /users/:id
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<StoredUser>> {
    state
        .users
        .remove(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("User with id {} not found", id)))
}
