//! Account store capability.
//!
//! The persistence collaborator the auth service depends on. Any engine that
//! implements [`AccountStore`] can back the service; implementations must keep
//! `email` unique and report a violation as [`StoreError::Duplicate`].

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::user::User;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Failures reported by an account store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No record matches the lookup key
    #[error("user not found")]
    NotFound,

    /// A record with the same email already exists
    #[error("user with this email already exists")]
    Duplicate,

    /// Storage engine failure
    #[error("storage error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        StoreError::Backend(msg.into())
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Durable lookup and creation of user records.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Find a user by email address
    async fn get_user_by_email(&self, email: &str) -> StoreResult<User>;

    /// Find a user by ID
    async fn get_user_by_id(&self, id: Uuid) -> StoreResult<User>;

    /// Persist a new user
    async fn create_user(&self, user: &User) -> StoreResult<()>;
}
