//! User API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{UserCreate, UserInfo, UserUpdate};
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

/// List all users
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<UserInfo>>>> {
    let repo = UserRepository::new(state.get_db());
    let users = repo.find_all().await?;
    Ok(ok(users.iter().map(UserInfo::from).collect()))
}

/// Get user by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<UserInfo>>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", id)))?;
    Ok(ok(UserInfo::from(&user)))
}

/// Create a new user
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<AppResponse<UserInfo>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = UserRepository::new(state.get_db());
    let user = repo.create(payload).await?;

    tracing::info!(email = %user.email, "User created");
    Ok(ok_with_message(UserInfo::from(&user), "User created"))
}

/// Update a user
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<AppResponse<UserInfo>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = UserRepository::new(state.get_db());
    let user = repo.update(&id, payload).await?;

    tracing::info!(user_id = %id, "User updated");
    Ok(ok_with_message(UserInfo::from(&user), "User updated"))
}

/// Hard delete a user and their bookings
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<bool>>> {
    let repo = UserRepository::new(state.get_db());
    let result = repo.delete(&id).await?;

    tracing::info!(user_id = %id, "User deleted");
    Ok(ok_with_message(result, "User deleted"))
}
