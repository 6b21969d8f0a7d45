//! Booking API Handlers
//!
//! The list is always scoped to the authenticated user; the owner of a
//! new booking is always the authenticated user. Lookup, update and
//! delete operate by id without an owner filter.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use axum::Extension;
use serde::Deserialize;
use surrealdb::RecordId;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Booking, BookingCreate, BookingUpdate};
use crate::db::repository::BookingRepository;
use crate::utils::{AppError, AppResponse, AppResult, ok, ok_with_message};

/// 分页参数
///
/// page 从 1 开始，per_page 上限 100
#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

fn default_page() -> usize {
    1
}

fn default_per_page() -> usize {
    20
}

impl Pagination {
    fn limit(&self) -> usize {
        self.per_page.clamp(1, 100)
    }

    fn start(&self) -> usize {
        // page 来自查询字符串，任意 usize 都可能出现
        self.page.max(1).saturating_sub(1).saturating_mul(self.limit())
    }
}

/// 解析当前用户的 RecordId ("user:xxx")
fn owner_record_id(user: &CurrentUser) -> Result<RecordId, AppError> {
    user.id
        .parse()
        .map_err(|_| AppError::internal(format!("Malformed user id in token: {}", user.id)))
}

/// List the current user's bookings, newest first
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<AppResponse<Vec<Booking>>>> {
    let owner = owner_record_id(&user)?;
    let repo = BookingRepository::new(state.get_db());
    let bookings = repo
        .find_by_owner(&owner, pagination.limit(), pagination.start())
        .await?;
    Ok(ok(bookings))
}

/// Get booking by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<Booking>>> {
    let repo = BookingRepository::new(state.get_db());
    let booking = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Booking {} not found", id)))?;
    Ok(ok(booking))
}

/// Create a new booking owned by the current user
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<BookingCreate>,
) -> AppResult<Json<AppResponse<Booking>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let owner = owner_record_id(&user)?;
    let repo = BookingRepository::new(state.get_db());
    let booking = repo.create(&owner, payload).await?;

    tracing::info!(
        owner = %user.email,
        date_time = %booking.date_time,
        guests = booking.guests,
        "Booking created"
    );
    Ok(ok_with_message(booking, "Booking created"))
}

/// Update a booking
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<BookingUpdate>,
) -> AppResult<Json<AppResponse<Booking>>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let repo = BookingRepository::new(state.get_db());
    let booking = repo.update(&id, payload).await?;

    tracing::info!(booking_id = %id, "Booking updated");
    Ok(ok_with_message(booking, "Booking updated"))
}

/// Hard delete a booking
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<AppResponse<bool>>> {
    let repo = BookingRepository::new(state.get_db());
    let result = repo.delete(&id).await?;

    tracing::info!(booking_id = %id, "Booking deleted");
    Ok(ok_with_message(result, "Booking deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_clamping() {
        let p = Pagination {
            page: 0,
            per_page: 500,
        };
        assert_eq!(p.limit(), 100);
        assert_eq!(p.start(), 0);

        let p = Pagination {
            page: 3,
            per_page: 20,
        };
        assert_eq!(p.start(), 40);
    }

    #[test]
    fn pagination_start_saturates_on_huge_page() {
        let p = Pagination {
            page: usize::MAX,
            per_page: 100,
        };
        assert_eq!(p.start(), usize::MAX);
    }
}
