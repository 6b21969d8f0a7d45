//! Dining Table Repository

use super::{BaseRepository, RepoError, RepoResult, current_timestamp, parse_record_id};
use crate::db::models::{Table, TableCreate, TableUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "dining_table";

#[derive(Clone)]
pub struct TableRepository {
    base: BaseRepository,
}

impl TableRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all tables ordered by number
    pub async fn find_all(&self) -> RepoResult<Vec<Table>> {
        let tables: Vec<Table> = self
            .base
            .db()
            .query("SELECT * FROM dining_table ORDER BY number")
            .await?
            .take(0)?;
        Ok(tables)
    }

    /// Find table by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Table>> {
        let thing = parse_record_id(id, TABLE)?;
        let table: Option<Table> = self.base.db().select(thing).await?;
        Ok(table)
    }

    /// Create a new table
    ///
    /// Table numbers are deliberately not uniqueness-checked.
    pub async fn create(&self, data: TableCreate) -> RepoResult<Table> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE dining_table SET
                    number = $number,
                    capacity = $capacity,
                    created_at = $created_at
                RETURN AFTER"#,
            )
            .bind(("number", data.number))
            .bind(("capacity", data.capacity))
            .bind(("created_at", current_timestamp()))
            .await?;

        let created: Option<Table> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create table".to_string()))
    }

    /// Update a table
    pub async fn update(&self, id: &str, data: TableUpdate) -> RepoResult<Table> {
        let thing = parse_record_id(id, TABLE)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", id)))?;

        let number = data.number.unwrap_or(existing.number);
        let capacity = data.capacity.unwrap_or(existing.capacity);

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    number = $number,
                    capacity = $capacity
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("number", number))
            .bind(("capacity", capacity))
            .await?;

        result
            .take::<Option<Table>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", id)))
    }

    /// Hard delete a table, cascading to bookings that reference it
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_record_id(id, TABLE)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Table {} not found", id)))?;

        // Cascade: dependent bookings go with the table
        self.base
            .db()
            .query("DELETE booking WHERE dining_table = $thing")
            .bind(("thing", thing.clone()))
            .await?;

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
