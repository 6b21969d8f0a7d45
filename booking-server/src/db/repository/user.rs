//! User Repository
//!
//! The account factory: normalizes emails, hashes passwords and enforces
//! email uniqueness before anything reaches the database.

use super::{BaseRepository, RepoError, RepoResult, current_timestamp, parse_record_id};
use crate::db::models::{User, UserCreate, UserUpdate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all users ordered by email
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user ORDER BY email")
            .await?
            .take(0)?;
        Ok(users)
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let thing = parse_record_id(id, TABLE)?;
        let user: Option<User> = self.base.db().select(thing).await?;
        Ok(user)
    }

    /// Find user by email (normalized before lookup)
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email = User::normalize_email(email);
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Count all users (used for first-run superuser seeding)
    pub async fn count(&self) -> RepoResult<usize> {
        let users: Vec<User> = self.base.db().query("SELECT * FROM user").await?.take(0)?;
        Ok(users.len())
    }

    /// Create a new user
    ///
    /// Normalizes the email to lower case, hashes the password and
    /// persists. Fails when the email is empty or already registered.
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        let email = User::normalize_email(&data.email);
        if email.is_empty() {
            return Err(RepoError::Validation(
                "Email address is required".to_string(),
            ));
        }

        // Check duplicate email
        if self.find_by_email(&email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Email '{}' is already registered",
                email
            )));
        }

        let hash_pass = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE user SET
                    email = $email,
                    first_name = $first_name,
                    last_name = $last_name,
                    hash_pass = $hash_pass,
                    is_active = true,
                    is_staff = $is_staff,
                    is_superuser = $is_superuser,
                    created_at = $created_at
                RETURN AFTER"#,
            )
            .bind(("email", email))
            .bind(("first_name", data.first_name))
            .bind(("last_name", data.last_name))
            .bind(("hash_pass", hash_pass))
            .bind(("is_staff", data.is_staff))
            .bind(("is_superuser", data.is_superuser))
            .bind(("created_at", current_timestamp()))
            .await?;

        let created: Option<User> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Create a superuser
    ///
    /// Delegates to [`create`](Self::create) with the staff and superuser
    /// flags forced true, whatever the payload says.
    pub async fn create_superuser(&self, mut data: UserCreate) -> RepoResult<User> {
        data.is_staff = true;
        data.is_superuser = true;
        self.create(data).await
    }

    /// Update a user
    ///
    /// A new email is normalized and uniqueness-checked; a new password
    /// is hashed before storage.
    pub async fn update(&self, id: &str, data: UserUpdate) -> RepoResult<User> {
        let thing = parse_record_id(id, TABLE)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))?;

        let email = match data.email {
            Some(ref new_email) => {
                let normalized = User::normalize_email(new_email);
                if normalized.is_empty() {
                    return Err(RepoError::Validation(
                        "Email address is required".to_string(),
                    ));
                }
                if normalized != existing.email
                    && self.find_by_email(&normalized).await?.is_some()
                {
                    return Err(RepoError::Duplicate(format!(
                        "Email '{}' is already registered",
                        normalized
                    )));
                }
                normalized
            }
            None => existing.email,
        };

        let hash_pass = match data.password {
            Some(ref password) => User::hash_password(password)
                .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?,
            None => existing.hash_pass,
        };

        let first_name = data.first_name.or(existing.first_name);
        let last_name = data.last_name.or(existing.last_name);
        let is_active = data.is_active.unwrap_or(existing.is_active);
        let is_staff = data.is_staff.unwrap_or(existing.is_staff);
        let is_superuser = data.is_superuser.unwrap_or(existing.is_superuser);

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    email = $email,
                    first_name = $first_name,
                    last_name = $last_name,
                    hash_pass = $hash_pass,
                    is_active = $is_active,
                    is_staff = $is_staff,
                    is_superuser = $is_superuser
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("email", email))
            .bind(("first_name", first_name))
            .bind(("last_name", last_name))
            .bind(("hash_pass", hash_pass))
            .bind(("is_active", is_active))
            .bind(("is_staff", is_staff))
            .bind(("is_superuser", is_superuser))
            .await?;

        result
            .take::<Option<User>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// Hard delete a user, cascading to their bookings
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = parse_record_id(id, TABLE)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))?;

        // Cascade: bookings are owned by the user
        self.base
            .db()
            .query("DELETE booking WHERE owner = $thing")
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
