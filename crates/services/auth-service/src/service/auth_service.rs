//! Authentication service - registration, login and self-lookup.
//!
//! Every store, hashing or signing failure is translated here into one
//! [`AppError`] kind. Login failures all collapse into
//! `AuthenticationFailure` so callers cannot tell an unknown email from a
//! wrong password; the logs still can.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use crate::token::{bearer, split_bearer, Claims, TokenCodec};
use common::{AppError, AppResult, JwtConfig};
use domain::{AccountStore, Password, StoreError, User};

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new account
    async fn sign_up(&self, email: &str, password: &str) -> AppResult<()>;

    /// Check credentials and return `"Bearer <token>"`
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<String>;

    /// Resolve an `Authorization` header value to its account
    async fn self_lookup(&self, authorization: &str) -> AppResult<User>;
}

/// Concrete implementation of AuthService over an account store.
///
/// Holds no mutable state; share it behind an `Arc` across requests.
pub struct Authenticator {
    store: Arc<dyn AccountStore>,
    codec: TokenCodec,
}

impl Authenticator {
    /// Create new auth service instance
    pub fn new(store: Arc<dyn AccountStore>, codec: TokenCodec) -> Self {
        Self { store, codec }
    }

    /// Create an instance signing with the configured key.
    pub fn from_config(store: Arc<dyn AccountStore>, config: &JwtConfig) -> Self {
        Self::new(store, TokenCodec::new(config.sign_key_bytes()))
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

#[async_trait]
impl AuthService for Authenticator {
    async fn sign_up(&self, email: &str, password: &str) -> AppResult<()> {
        let start = Instant::now();
        info!(layer = "domain", email, "processing registration request");

        // A lookup error other than NotFound does not block registration;
        // the store's unique constraint is the final arbiter.
        match self.store.get_user_by_email(email).await {
            Ok(_) => {
                warn!(layer = "domain", email, "user with email already registered");
                return Err(AppError::DuplicateAccount);
            }
            Err(StoreError::NotFound) => {}
            Err(e) => {
                warn!(layer = "domain", email, error = %e, "email pre-check failed, continuing");
            }
        }

        let password_hash = Password::new(password)
            .map_err(|e| {
                warn!(layer = "domain", error = %e, "error hashing user password");
                AppError::RegistrationFailure
            })?
            .into_string();

        let user = User::new(Uuid::new_v4(), email.to_string(), password_hash);

        user.validate().map_err(|e| {
            warn!(layer = "domain", email, error = %e, "error validating user");
            AppError::from(e)
        })?;

        self.store.create_user(&user).await.map_err(|e| {
            warn!(layer = "domain", email, error = %e, "error creating user");
            match e {
                StoreError::Duplicate => AppError::DuplicateAccount,
                _ => AppError::RegistrationFailure,
            }
        })?;

        info!(
            layer = "domain",
            email,
            user_id = %user.id,
            duration_ms = elapsed_ms(start),
            "successfully registered user"
        );

        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<String> {
        let start = Instant::now();
        info!(layer = "domain", email, "processing authorization request");

        let user = self.store.get_user_by_email(email).await.map_err(|e| {
            warn!(layer = "domain", email, error = %e, "user lookup failed");
            AppError::AuthenticationFailure
        })?;

        if !Password::from_hash(user.password_hash.as_str()).verify(password) {
            warn!(layer = "domain", email, "invalid user password");
            return Err(AppError::AuthenticationFailure);
        }

        let claims = Claims::new(user.id, user.email.as_str());
        let token = self.codec.issue(&claims).map_err(|e| {
            warn!(layer = "domain", email, error = %e, "error generating token");
            AppError::AuthenticationFailure
        })?;

        info!(
            layer = "domain",
            email,
            user_id = %user.id,
            duration_ms = elapsed_ms(start),
            "successfully authorized user"
        );

        Ok(bearer(&token))
    }

    async fn self_lookup(&self, authorization: &str) -> AppResult<User> {
        let start = Instant::now();
        info!(layer = "domain", "processing get user self request");

        let token = split_bearer(authorization)
            .inspect_err(|_| warn!(layer = "domain", "invalid authorization header"))?;

        let claims = self
            .codec
            .parse(token)
            .inspect_err(|_| warn!(layer = "domain", "token parsing error"))?;

        let user = self.store.get_user_by_id(claims.id).await.map_err(|e| {
            warn!(layer = "domain", user_id = %claims.id, error = %e, "error getting user");
            AppError::LookupFailure
        })?;

        info!(
            layer = "domain",
            email = %user.email,
            user_id = %user.id,
            duration_ms = elapsed_ms(start),
            "successfully resolved token owner"
        );

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use domain::MockAccountStore;
    use mockall::predicate::eq;

    const KEY: &[u8] = b"unit-test-key";

    fn service(store: MockAccountStore) -> Authenticator {
        Authenticator::new(Arc::new(store), TokenCodec::new(KEY))
    }

    fn stored_user(email: &str, password: &str) -> User {
        let hash = Password::new(password).unwrap().into_string();
        User::new(Uuid::new_v4(), email.to_string(), hash)
    }

    #[tokio::test]
    async fn test_sign_up_proceeds_when_pre_check_errors() {
        let mut store = MockAccountStore::new();
        store
            .expect_get_user_by_email()
            .returning(|_| Err(StoreError::backend("connection reset")));
        store
            .expect_create_user()
            .times(1)
            .returning(|_| Ok(()));

        assert!(service(store).sign_up("a@example.com", "pw123").await.is_ok());
    }

    #[tokio::test]
    async fn test_sign_up_store_failure_is_opaque() {
        let mut store = MockAccountStore::new();
        store
            .expect_get_user_by_email()
            .returning(|_| Err(StoreError::NotFound));
        store
            .expect_create_user()
            .returning(|_| Err(StoreError::backend("disk full at /var/lib/postgres")));

        let err = service(store).sign_up("a@example.com", "pw123").await.unwrap_err();
        assert!(matches!(err, AppError::RegistrationFailure));
        assert!(!err.user_message().contains("disk"));
    }

    #[tokio::test]
    async fn test_sign_up_unique_violation_is_duplicate() {
        let mut store = MockAccountStore::new();
        store
            .expect_get_user_by_email()
            .returning(|_| Err(StoreError::NotFound));
        store
            .expect_create_user()
            .returning(|_| Err(StoreError::Duplicate));

        let err = service(store).sign_up("a@example.com", "pw123").await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateAccount));
    }

    #[tokio::test]
    async fn test_sign_up_stores_hash_not_password() {
        let mut store = MockAccountStore::new();
        store
            .expect_get_user_by_email()
            .returning(|_| Err(StoreError::NotFound));
        store
            .expect_create_user()
            .withf(|user: &User| {
                user.email == "a@example.com"
                    && user.password_hash != "pw123"
                    && Password::from_hash(user.password_hash.as_str()).verify("pw123")
                    && user.created_at == user.updated_at
            })
            .times(1)
            .returning(|_| Ok(()));

        service(store).sign_up("a@example.com", "pw123").await.unwrap();
    }

    #[tokio::test]
    async fn test_sign_up_hashing_failure() {
        let mut store = MockAccountStore::new();
        store
            .expect_get_user_by_email()
            .returning(|_| Err(StoreError::NotFound));
        store.expect_create_user().never();

        let huge = "x".repeat(domain::MAX_PASSWORD_BYTES + 1);
        let err = service(store).sign_up("a@example.com", &huge).await.unwrap_err();
        assert!(matches!(err, AppError::RegistrationFailure));
    }

    #[tokio::test]
    async fn test_sign_in_store_error_is_authentication_failure() {
        let mut store = MockAccountStore::new();
        store
            .expect_get_user_by_email()
            .withf(|email: &str| email == "a@example.com")
            .returning(|_| Err(StoreError::backend("timeout")));

        let err = service(store).sign_in("a@example.com", "pw123").await.unwrap_err();
        assert!(matches!(err, AppError::AuthenticationFailure));
    }

    #[tokio::test]
    async fn test_sign_in_returns_bearer_token_for_user() {
        let user = stored_user("a@example.com", "pw123");
        let expected = user.clone();

        let mut store = MockAccountStore::new();
        store
            .expect_get_user_by_email()
            .returning(move |_| Ok(user.clone()));

        let header = service(store).sign_in("a@example.com", "pw123").await.unwrap();
        let token = header.strip_prefix("Bearer ").unwrap();

        let claims = TokenCodec::new(KEY).parse(token).unwrap();
        assert_eq!(claims.id, expected.id);
        assert_eq!(claims.email, expected.email);
    }

    #[tokio::test]
    async fn test_self_lookup_store_error_is_lookup_failure() {
        let user = stored_user("a@example.com", "pw123");
        let token = TokenCodec::new(KEY)
            .issue(&Claims::new(user.id, user.email.as_str()))
            .unwrap();

        let mut store = MockAccountStore::new();
        store
            .expect_get_user_by_id()
            .with(eq(user.id))
            .returning(|_| Err(StoreError::backend("pool exhausted")));

        let err = service(store)
            .self_lookup(&bearer(&token))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::LookupFailure));
    }

    #[tokio::test]
    async fn test_self_lookup_bad_header_never_hits_store() {
        let mut store = MockAccountStore::new();
        store.expect_get_user_by_id().never();
        let service = service(store);

        for header in ["", "pw123", "Basic xyz", "Bearer not.a.token"] {
            let err = service.self_lookup(header).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidToken), "{header:?}");
        }
    }
}
