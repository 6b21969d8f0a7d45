//! Dining Table Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Dining table entity — a seating resource with a capacity.
///
/// Table numbers are not unique; two tables may carry the same number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub number: i32,
    pub capacity: i32,
    #[serde(default)]
    pub created_at: i64,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TableCreate {
    pub number: i32,
    #[validate(range(min = 1, message = "must seat at least one guest"))]
    pub capacity: i32,
}

/// Update dining table payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TableUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<i32>,
    #[validate(range(min = 1, message = "must seat at least one guest"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i32>,
}
