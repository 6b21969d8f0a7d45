//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Table, TableCreate, TableUpdate};
use crate::db::repository::TableRepository;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

/// List all tables ordered by number
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<AppResponse<Vec<Table>>>> {
    let repo = TableRepository::new(state.get_db());
    let tables = repo.find_all().await?;
    Ok(ok(tables))
}

/// Get table by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Table>>> {
    let repo = TableRepository::new(state.get_db());
    let table = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Table {} not found", id)))?;
    Ok(ok(table))
}

/// Create a new table
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TableCreate>,
) -> AppResult<Json<AppResponse<Table>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = TableRepository::new(state.get_db());
    let table = repo.create(payload).await?;

    tracing::info!(number = table.number, "Table created");
    Ok(ok_with_message(table, "Table created"))
}

/// Update a table
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TableUpdate>,
) -> AppResult<Json<AppResponse<Table>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = TableRepository::new(state.get_db());
    let table = repo.update(&id, payload).await?;

    tracing::info!(table_id = %id, "Table updated");
    Ok(ok_with_message(table, "Table updated"))
}

/// Hard delete a table and the bookings that reference it
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<bool>>> {
    let repo = TableRepository::new(state.get_db());
    let result = repo.delete(&id).await?;

    tracing::info!(table_id = %id, "Table deleted");
    Ok(ok_with_message(result, "Table deleted"))
}
