//! Booking Repository
//!
//! Enforces the reservation invariants on create and update:
//! the guest count must fit the referenced table's capacity, and a
//! table cannot be claimed twice for the same moment in time. Both
//! checks only apply when the booking references a table.

use super::{BaseRepository, RepoError, RepoResult, current_timestamp, parse_record_id};
use crate::db::models::{Booking, BookingCreate, BookingUpdate, Table};
use chrono::{DateTime, Utc};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "booking";

#[derive(Clone)]
pub struct BookingRepository {
    base: BaseRepository,
}

impl BookingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find bookings owned by a user, newest first, paginated
    pub async fn find_by_owner(
        &self,
        owner: &RecordId,
        limit: usize,
        start: usize,
    ) -> RepoResult<Vec<Booking>> {
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query(
                "SELECT * FROM booking WHERE owner = $owner \
                 ORDER BY date_time DESC LIMIT $limit START $start",
            )
            .bind(("owner", owner.clone()))
            .bind(("limit", limit))
            .bind(("start", start))
            .await?
            .take(0)?;
        Ok(bookings)
    }

    /// Find booking by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Booking>> {
        let thing = parse_record_id(id, TABLE)?;
        let booking: Option<Booking> = self.base.db().select(thing).await?;
        Ok(booking)
    }

    /// Create a new booking
    ///
    /// The owner is taken from the authenticated identity — any owner
    /// value inside the payload is discarded.
    pub async fn create(&self, owner: &RecordId, data: BookingCreate) -> RepoResult<Booking> {
        if let Some(ref table_id) = data.dining_table {
            let table = self.fetch_table(table_id).await?;
            self.check_capacity(&table, data.guests)?;
            self.check_slot_free(table_id, data.date_time, None).await?;
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE booking SET
                    owner = $owner,
                    dining_table = $dining_table,
                    date_time = $date_time,
                    guests = $guests,
                    confirmed = $confirmed,
                    created_at = $created_at
                RETURN AFTER"#,
            )
            .bind(("owner", owner.clone()))
            .bind(("dining_table", data.dining_table))
            .bind(("date_time", data.date_time))
            .bind(("guests", data.guests))
            .bind(("confirmed", data.confirmed))
            .bind(("created_at", current_timestamp()))
            .await?;

        let created: Option<Booking> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create booking".to_string()))
    }

    /// Update a booking
    ///
    /// The invariants are re-checked against the effective (merged)
    /// values. The owner never changes.
    pub async fn update(&self, id: &str, data: BookingUpdate) -> RepoResult<Booking> {
        let thing = parse_record_id(id, TABLE)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Booking {} not found", id)))?;

        let dining_table = data.dining_table.or(existing.dining_table);
        let date_time = data.date_time.unwrap_or(existing.date_time);
        let guests = data.guests.unwrap_or(existing.guests);
        let confirmed = data.confirmed.unwrap_or(existing.confirmed);

        if let Some(ref table_id) = dining_table {
            let table = self.fetch_table(table_id).await?;
            self.check_capacity(&table, guests)?;
            self.check_slot_free(table_id, date_time, Some(&thing))
                .await?;
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    dining_table = $dining_table,
                    date_time = $date_time,
                    guests = $guests,
                    confirmed = $confirmed
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("dining_table", dining_table))
            .bind(("date_time", date_time))
            .bind(("guests", guests))
            .bind(("confirmed", confirmed))
            .await?;

        result
            .take::<Option<Booking>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Booking {} not found", id)))
    }

    /// Hard delete a booking
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_record_id(id, TABLE)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Booking {} not found", id)))?;

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }

    async fn fetch_table(&self, table_id: &RecordId) -> RepoResult<Table> {
        let table: Option<Table> = self.base.db().select(table_id.clone()).await?;
        table.ok_or_else(|| RepoError::NotFound(format!("Table {} not found", table_id)))
    }

    fn check_capacity(&self, table: &Table, guests: i32) -> RepoResult<()> {
        if guests > table.capacity {
            return Err(RepoError::BusinessRule(format!(
                "Table {} seats {} guests, got {}",
                table.number, table.capacity, guests
            )));
        }
        Ok(())
    }

    /// Reject a second booking claiming the same table at the same time.
    /// `exclude` skips the booking being updated.
    async fn check_slot_free(
        &self,
        table_id: &RecordId,
        date_time: DateTime<Utc>,
        exclude: Option<&RecordId>,
    ) -> RepoResult<()> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM booking \
                 WHERE dining_table = $dining_table AND date_time = $date_time LIMIT 2",
            )
            .bind(("dining_table", table_id.clone()))
            .bind(("date_time", date_time))
            .await?;
        let clashing: Vec<Booking> = result.take(0)?;

        let taken = match exclude {
            Some(own_id) => clashing.iter().any(|b| b.id.as_ref() != Some(own_id)),
            None => !clashing.is_empty(),
        };

        if taken {
            return Err(RepoError::Duplicate(format!(
                "Table {} is already booked at {}",
                table_id, date_time
            )));
        }
        Ok(())
    }
}
