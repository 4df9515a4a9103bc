//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! the user record and its validation, the password hasher and the
//! account store capability consumed by the auth service.

pub mod constants;
pub mod error;
pub mod password;
pub mod store;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use password::Password;
pub use store::{AccountStore, StoreError, StoreResult};
pub use user::{User, UserResponse};

#[cfg(any(test, feature = "test-utils"))]
pub use store::MockAccountStore;
