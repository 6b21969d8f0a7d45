//! Repository integration tests against an embedded RocksDB instance.
//! Run: cargo test -p booking-server --test booking_repository

use booking_server::db::DbService;
use booking_server::db::models::{
    BookingCreate, BookingUpdate, TableCreate, User, UserCreate,
};
use booking_server::db::repository::{
    BookingRepository, RepoError, TableRepository, UserRepository,
};
use chrono::{DateTime, TimeZone, Utc};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

async fn test_db() -> (tempfile::TempDir, Surreal<Db>) {
    let tmp = tempfile::tempdir().unwrap();
    let service = DbService::new(&tmp.path().join("test.db")).await.unwrap();
    (tmp, service.db)
}

fn user_payload(email: &str) -> UserCreate {
    UserCreate {
        email: email.to_string(),
        password: "s3cret-pass".to_string(),
        first_name: None,
        last_name: None,
        is_staff: false,
        is_superuser: false,
    }
}

fn booking_payload(table: Option<&booking_server::db::models::Table>, dt: DateTime<Utc>, guests: i32) -> BookingCreate {
    BookingCreate {
        owner: None,
        dining_table: table.and_then(|t| t.id.clone()),
        date_time: dt,
        guests,
        confirmed: false,
    }
}

fn dt(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap()
}

async fn create_user(db: &Surreal<Db>, email: &str) -> User {
    UserRepository::new(db.clone())
        .create(user_payload(email))
        .await
        .unwrap()
}

#[tokio::test]
async fn create_user_normalizes_email_and_hashes_password() {
    let (_tmp, db) = test_db().await;
    let repo = UserRepository::new(db.clone());

    let user = repo.create(user_payload("  John@Example.COM ")).await.unwrap();
    assert_eq!(user.email, "john@example.com");
    assert!(user.is_active);
    assert!(!user.is_staff);
    assert!(user.verify_password("s3cret-pass").unwrap());
    assert!(!user.verify_password("wrong").unwrap());

    // Lookup is case-insensitive through normalization
    let found = repo.find_by_email("JOHN@example.com").await.unwrap();
    assert!(found.is_some());
}

#[tokio::test]
async fn create_user_rejects_empty_email() {
    let (_tmp, db) = test_db().await;
    let repo = UserRepository::new(db);

    let err = repo.create(user_payload("   ")).await.unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[tokio::test]
async fn create_user_rejects_duplicate_email() {
    let (_tmp, db) = test_db().await;
    let repo = UserRepository::new(db);

    repo.create(user_payload("a@x.com")).await.unwrap();
    let err = repo.create(user_payload("A@X.COM")).await.unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));
}

#[tokio::test]
async fn create_superuser_forces_flags() {
    let (_tmp, db) = test_db().await;
    let repo = UserRepository::new(db);

    // Payload says regular user; the factory overrides both flags
    let admin = repo.create_superuser(user_payload("admin@x.com")).await.unwrap();
    assert!(admin.is_staff);
    assert!(admin.is_superuser);
}

#[tokio::test]
async fn update_user_rehashes_password_and_checks_email() {
    let (_tmp, db) = test_db().await;
    let repo = UserRepository::new(db);

    let a = repo.create(user_payload("a@x.com")).await.unwrap();
    repo.create(user_payload("b@x.com")).await.unwrap();

    let a_id = a.id.clone().unwrap().to_string();

    // Taking b's email must fail
    let err = repo
        .update(
            &a_id,
            booking_server::db::models::UserUpdate {
                email: Some("B@x.com".to_string()),
                password: None,
                first_name: None,
                last_name: None,
                is_active: None,
                is_staff: None,
                is_superuser: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));

    // Password change takes effect
    let updated = repo
        .update(
            &a_id,
            booking_server::db::models::UserUpdate {
                email: None,
                password: Some("new-pass-123".to_string()),
                first_name: Some("Ann".to_string()),
                last_name: None,
                is_active: None,
                is_staff: None,
                is_superuser: None,
            },
        )
        .await
        .unwrap();
    assert!(updated.verify_password("new-pass-123").unwrap());
    assert_eq!(updated.first_name.as_deref(), Some("Ann"));
}

#[tokio::test]
async fn booking_listing_is_owner_scoped_and_newest_first() {
    let (_tmp, db) = test_db().await;
    let bookings = BookingRepository::new(db.clone());

    let a = create_user(&db, "a@x.com").await;
    let b = create_user(&db, "b@x.com").await;
    let a_id = a.id.unwrap();
    let b_id = b.id.unwrap();

    bookings.create(&a_id, booking_payload(None, dt(18), 2)).await.unwrap();
    bookings.create(&a_id, booking_payload(None, dt(20), 2)).await.unwrap();
    bookings.create(&b_id, booking_payload(None, dt(19), 4)).await.unwrap();

    let mine = bookings.find_by_owner(&a_id, 20, 0).await.unwrap();
    assert_eq!(mine.len(), 2);
    // Newest first
    assert_eq!(mine[0].date_time, dt(20));
    assert_eq!(mine[1].date_time, dt(18));
    assert!(mine.iter().all(|bk| bk.owner == a_id));

    // Pagination
    let page2 = bookings.find_by_owner(&a_id, 1, 1).await.unwrap();
    assert_eq!(page2.len(), 1);
    assert_eq!(page2[0].date_time, dt(18));
}

#[tokio::test]
async fn booking_rejects_guests_over_table_capacity() {
    let (_tmp, db) = test_db().await;
    let tables = TableRepository::new(db.clone());
    let bookings = BookingRepository::new(db.clone());

    let owner = create_user(&db, "a@x.com").await.id.unwrap();
    let table = tables.create(TableCreate { number: 5, capacity: 4 }).await.unwrap();

    let err = bookings
        .create(&owner, booking_payload(Some(&table), dt(19), 6))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::BusinessRule(_)));

    // At capacity is fine
    bookings
        .create(&owner, booking_payload(Some(&table), dt(19), 4))
        .await
        .unwrap();
}

#[tokio::test]
async fn booking_rejects_second_claim_on_same_slot() {
    let (_tmp, db) = test_db().await;
    let tables = TableRepository::new(db.clone());
    let bookings = BookingRepository::new(db.clone());

    let a = create_user(&db, "a@x.com").await.id.unwrap();
    let b = create_user(&db, "b@x.com").await.id.unwrap();
    let table = tables.create(TableCreate { number: 1, capacity: 6 }).await.unwrap();

    bookings
        .create(&a, booking_payload(Some(&table), dt(19), 2))
        .await
        .unwrap();

    // Same table, same moment - rejected whoever asks
    let err = bookings
        .create(&b, booking_payload(Some(&table), dt(19), 2))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));

    // A different time slot on the same table is free
    bookings
        .create(&b, booking_payload(Some(&table), dt(21), 2))
        .await
        .unwrap();

    // A table-less booking never clashes
    bookings.create(&b, booking_payload(None, dt(19), 2)).await.unwrap();
}

#[tokio::test]
async fn booking_update_rechecks_invariants_but_allows_own_slot() {
    let (_tmp, db) = test_db().await;
    let tables = TableRepository::new(db.clone());
    let bookings = BookingRepository::new(db.clone());

    let owner = create_user(&db, "a@x.com").await.id.unwrap();
    let table = tables.create(TableCreate { number: 2, capacity: 4 }).await.unwrap();

    let booking = bookings
        .create(&owner, booking_payload(Some(&table), dt(19), 2))
        .await
        .unwrap();
    let booking_id = booking.id.unwrap().to_string();

    // Confirming without moving keeps the same slot - must not clash with itself
    let confirmed = bookings
        .update(
            &booking_id,
            BookingUpdate {
                dining_table: None,
                date_time: None,
                guests: None,
                confirmed: Some(true),
            },
        )
        .await
        .unwrap();
    assert!(confirmed.confirmed);

    // Growing past the table capacity is rejected
    let err = bookings
        .update(
            &booking_id,
            BookingUpdate {
                dining_table: None,
                date_time: None,
                guests: Some(6),
                confirmed: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::BusinessRule(_)));

    // Moving onto an occupied slot is rejected
    bookings
        .create(&owner, booking_payload(Some(&table), dt(21), 2))
        .await
        .unwrap();
    let err = bookings
        .update(
            &booking_id,
            BookingUpdate {
                dining_table: None,
                date_time: Some(dt(21)),
                guests: None,
                confirmed: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));
}

#[tokio::test]
async fn lookups_reject_ids_from_other_tables() {
    let (_tmp, db) = test_db().await;
    let users = UserRepository::new(db.clone());
    let tables = TableRepository::new(db.clone());
    let bookings = BookingRepository::new(db.clone());

    let user_id = create_user(&db, "a@x.com").await.id.unwrap().to_string();

    // A user id aimed at the booking repository is a validation error,
    // not a deserialization blow-up
    let err = bookings.find_by_id(&user_id).await.unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let err = tables.find_by_id(&user_id).await.unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let err = users.find_by_id("booking:abc").await.unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    // Mutations go through the same guard
    let err = bookings.delete(&user_id).await.unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[tokio::test]
async fn deleting_user_cascades_to_their_bookings() {
    let (_tmp, db) = test_db().await;
    let users = UserRepository::new(db.clone());
    let bookings = BookingRepository::new(db.clone());

    let a = create_user(&db, "a@x.com").await;
    let b = create_user(&db, "b@x.com").await;
    let a_id = a.id.unwrap();
    let b_id = b.id.clone().unwrap();

    bookings.create(&a_id, booking_payload(None, dt(18), 2)).await.unwrap();
    bookings.create(&b_id, booking_payload(None, dt(19), 2)).await.unwrap();

    users.delete(&a_id.to_string()).await.unwrap();

    assert!(bookings.find_by_owner(&a_id, 20, 0).await.unwrap().is_empty());
    // Unrelated bookings survive
    assert_eq!(bookings.find_by_owner(&b_id, 20, 0).await.unwrap().len(), 1);
}

#[tokio::test]
async fn deleting_table_cascades_to_its_bookings() {
    let (_tmp, db) = test_db().await;
    let tables = TableRepository::new(db.clone());
    let bookings = BookingRepository::new(db.clone());

    let owner = create_user(&db, "a@x.com").await.id.unwrap();
    let table = tables.create(TableCreate { number: 3, capacity: 4 }).await.unwrap();

    bookings
        .create(&owner, booking_payload(Some(&table), dt(19), 2))
        .await
        .unwrap();
    bookings.create(&owner, booking_payload(None, dt(20), 2)).await.unwrap();

    tables.delete(&table.id.unwrap().to_string()).await.unwrap();

    let remaining = bookings.find_by_owner(&owner, 20, 0).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert!(remaining[0].dining_table.is_none());
}

#[tokio::test]
async fn dinner_for_two() {
    // A guest books table 5 for two at seven in the evening
    let (_tmp, db) = test_db().await;
    let tables = TableRepository::new(db.clone());
    let bookings = BookingRepository::new(db.clone());

    let owner = create_user(&db, "a@x.com").await.id.unwrap();
    let table = tables.create(TableCreate { number: 5, capacity: 4 }).await.unwrap();

    let booking = bookings
        .create(&owner, booking_payload(Some(&table), dt(19), 2))
        .await
        .unwrap();

    assert_eq!(booking.owner, owner);
    assert_eq!(booking.guests, 2);
    assert!(!booking.confirmed);

    let mine = bookings.find_by_owner(&owner, 20, 0).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].dining_table, table.id);
}
