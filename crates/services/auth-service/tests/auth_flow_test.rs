//! End-to-end flows of the auth service over the in-memory account store.

use std::sync::Arc;

use auth_service_lib::{AuthService, Authenticator, Claims, TokenCodec};
use common::AppError;
use domain::AccountStore;
use user_service_lib::repository::MemoryStore;
use uuid::Uuid;

const KEY: &[u8] = b"integration-test-key";

fn setup() -> (Arc<MemoryStore>, Arc<Authenticator>) {
    let store = Arc::new(MemoryStore::new());
    let service = Arc::new(Authenticator::new(store.clone(), TokenCodec::new(KEY)));
    (store, service)
}

#[tokio::test]
async fn test_duplicate_sign_up_rejected() {
    let (store, service) = setup();

    service.sign_up("a@example.com", "pw123").await.unwrap();
    let err = service.sign_up("a@example.com", "other").await.unwrap_err();

    assert!(matches!(err, AppError::DuplicateAccount));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_sign_in_returns_bearer_token() {
    let (_store, service) = setup();

    service.sign_up("a@example.com", "pw123").await.unwrap();
    let token = service.sign_in("a@example.com", "pw123").await.unwrap();

    assert!(token.starts_with("Bearer "));
    assert_eq!(token.split(' ').count(), 2);
}

#[tokio::test]
async fn test_bad_credentials_are_indistinguishable() {
    let (_store, service) = setup();
    service.sign_up("a@example.com", "pw123").await.unwrap();

    let wrong_password = service.sign_in("a@example.com", "wrongpw").await.unwrap_err();
    let unknown_user = service.sign_in("noone@example.com", "x").await.unwrap_err();

    assert!(matches!(wrong_password, AppError::AuthenticationFailure));
    assert!(matches!(unknown_user, AppError::AuthenticationFailure));
    assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    assert_eq!(wrong_password.status(), unknown_user.status());
}

#[tokio::test]
async fn test_self_lookup_requires_bearer_scheme() {
    let (_store, service) = setup();
    service.sign_up("a@example.com", "pw123").await.unwrap();
    let header = service.sign_in("a@example.com", "pw123").await.unwrap();
    let raw_token = header.strip_prefix("Bearer ").unwrap();

    for value in [
        "pw123".to_string(),
        "Basic xyz".to_string(),
        raw_token.to_string(),
        format!("bearer {}", raw_token),
        format!("Bearer {} extra", raw_token),
    ] {
        let err = service.self_lookup(&value).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidToken), "{value:?}");
    }
}

#[tokio::test]
async fn test_invalid_email_never_reaches_store() {
    let (store, service) = setup();

    let err = service.sign_up("not-an-email", "pw123").await.unwrap_err();

    assert!(matches!(err, AppError::InvalidInput(ref msg) if msg == "invalid user email"));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_token_for_deleted_account_is_lookup_failure() {
    let (store, service) = setup();
    service.sign_up("a@example.com", "pw123").await.unwrap();
    let header = service.sign_in("a@example.com", "pw123").await.unwrap();
    let user = store.get_user_by_email("a@example.com").await.unwrap();

    store.delete_user(user.id).await.unwrap();

    let err = service.self_lookup(&header).await.unwrap_err();
    assert!(matches!(err, AppError::LookupFailure));
}

#[tokio::test]
async fn test_self_lookup_returns_full_record() {
    let (store, service) = setup();
    service.sign_up("a@example.com", "pw123").await.unwrap();
    let header = service.sign_in("a@example.com", "pw123").await.unwrap();

    let user = service.self_lookup(&header).await.unwrap();

    assert_eq!(user, store.get_user_by_email("a@example.com").await.unwrap());
    assert!(user.password_hash.starts_with("$argon2id$"));
}

#[tokio::test]
async fn test_token_from_another_key_rejected() {
    let (store, service) = setup();
    service.sign_up("a@example.com", "pw123").await.unwrap();
    let user = store.get_user_by_email("a@example.com").await.unwrap();

    let forged = TokenCodec::new(b"attacker-key")
        .issue(&Claims::new(user.id, user.email.as_str()))
        .unwrap();

    let err = service.self_lookup(&format!("Bearer {}", forged)).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidToken));
}

#[tokio::test]
async fn test_validly_signed_token_for_unknown_user() {
    let (_store, service) = setup();
    let token = TokenCodec::new(KEY)
        .issue(&Claims::new(Uuid::new_v4(), "ghost@example.com"))
        .unwrap();

    let err = service.self_lookup(&format!("Bearer {}", token)).await.unwrap_err();
    assert!(matches!(err, AppError::LookupFailure));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_sign_up_has_one_winner() {
    for _ in 0..5 {
        let (store, service) = setup();

        let first = tokio::spawn({
            let service = service.clone();
            async move { service.sign_up("race@example.com", "pw-one").await }
        });
        let second = tokio::spawn({
            let service = service.clone();
            async move { service.sign_up("race@example.com", "pw-two").await }
        });

        let results = [first.await.unwrap(), second.await.unwrap()];
        let successes = results.iter().filter(|r| r.is_ok()).count();
        let duplicates = results
            .iter()
            .filter(|r| matches!(r, Err(AppError::DuplicateAccount)))
            .count();

        assert_eq!(successes, 1);
        assert_eq!(duplicates, 1);
        assert_eq!(store.len().await, 1);
    }
}
