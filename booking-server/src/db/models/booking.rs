//! Booking Model
//!
//! Reservation record linking a user (owner), optionally a dining table,
//! a moment in time and a guest count. The owner is always the
//! authenticated identity that created the booking — any owner value
//! supplied by the client is discarded.

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Booking model matching the `booking` table
///
/// Default ordering is `date_time` descending (newest first).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    /// Owning user
    #[serde(with = "serde_helpers::record_id")]
    pub owner: RecordId,
    /// Reserved table, if any
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub dining_table: Option<RecordId>,
    pub date_time: DateTime<Utc>,
    pub guests: i32,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub confirmed: bool,
    #[serde(default)]
    pub created_at: i64,
}

/// Create booking payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookingCreate {
    /// Ignored — the authenticated identity is always assigned as owner
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub dining_table: Option<RecordId>,
    pub date_time: DateTime<Utc>,
    #[validate(range(min = 1, message = "must include at least one guest"))]
    pub guests: i32,
    #[serde(default)]
    pub confirmed: bool,
}

/// Update booking payload
///
/// The owner cannot be changed after creation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BookingUpdate {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub dining_table: Option<RecordId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime<Utc>>,
    #[validate(range(min = 1, message = "must include at least one guest"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guests: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed: Option<bool>,
}
