//! SeaORM account store tests against an in-memory SQLite database.

use uuid::Uuid;

use common::DatabaseConfig;
use domain::{AccountStore, StoreError, User};
use user_service_lib::infra::Database;
use user_service_lib::repository::UserStore;

async fn setup() -> (Database, UserStore) {
    // One connection: every SQLite memory connection is its own database
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        ..DatabaseConfig::default()
    };
    let db = Database::connect(&config).await.expect("connect sqlite");
    let store = UserStore::new(db.get_connection());
    (db, store)
}

fn user(email: &str) -> User {
    User::new(Uuid::new_v4(), email.to_string(), "$argon2id$hash".to_string())
}

#[tokio::test]
async fn test_create_then_find() {
    let (_db, store) = setup().await;
    let alice = user("a@example.com");

    store.create_user(&alice).await.unwrap();

    let by_email = store.get_user_by_email("a@example.com").await.unwrap();
    assert_eq!(by_email.id, alice.id);
    assert_eq!(by_email.password_hash, alice.password_hash);

    let by_id = store.get_user_by_id(alice.id).await.unwrap();
    assert_eq!(by_id.email, "a@example.com");
}

#[tokio::test]
async fn test_not_found() {
    let (_db, store) = setup().await;

    assert_eq!(
        store.get_user_by_email("noone@example.com").await.unwrap_err(),
        StoreError::NotFound
    );
    assert_eq!(
        store.get_user_by_id(Uuid::new_v4()).await.unwrap_err(),
        StoreError::NotFound
    );
}

#[tokio::test]
async fn test_unique_email_constraint() {
    let (_db, store) = setup().await;
    store.create_user(&user("a@example.com")).await.unwrap();

    let err = store.create_user(&user("a@example.com")).await.unwrap_err();
    assert_eq!(err, StoreError::Duplicate);
}

#[tokio::test]
async fn test_migration_status_and_ping() {
    let (db, _store) = setup().await;

    db.ping().await.unwrap();

    let status = db.migration_status().await.unwrap();
    assert_eq!(status.len(), 1);
    assert!(status.iter().all(|(_, applied)| *applied));
}
