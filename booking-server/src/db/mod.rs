//! Database Module
//!
//! Handles the embedded SurrealDB instance and schema definition

pub mod models;
pub mod repository;

use crate::utils::AppError;
use std::path::Path;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const NAMESPACE: &str = "booking";
const DATABASE: &str = "booking";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the database at the given path and define the schema
    pub async fn new(db_path: &Path) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {}", e)))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {}", e)))?;

        define_schema(&db).await?;

        tracing::info!(path = %db_path.display(), "Database connection established");

        Ok(Self { db })
    }
}

/// Define tables and indexes
///
/// The unique email index backs the account-identity invariant; the
/// booking indexes keep owner-scoped listing and slot lookups cheap.
async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        r#"
        DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS user_email ON TABLE user COLUMNS email UNIQUE;

        DEFINE TABLE IF NOT EXISTS dining_table SCHEMALESS;

        DEFINE TABLE IF NOT EXISTS booking SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS booking_owner ON TABLE booking COLUMNS owner;
        DEFINE INDEX IF NOT EXISTS booking_slot ON TABLE booking COLUMNS dining_table, date_time;
        "#,
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {}", e)))?;

    tracing::info!("Database schema defined");
    Ok(())
}
