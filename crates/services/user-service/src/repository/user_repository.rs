//! PostgreSQL account store backed by SeaORM.

use std::time::Instant;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set, SqlErr};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use domain::{AccountStore, StoreError, StoreResult, User};

/// Account store over a SeaORM connection pool.
///
/// Each operation is a single statement; email uniqueness is enforced by the
/// `users.email` unique constraint.
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Map a SeaORM error onto the store taxonomy.
fn store_error(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::Duplicate,
        _ => StoreError::backend(err.to_string()),
    }
}

#[async_trait]
impl AccountStore for UserStore {
    async fn get_user_by_email(&self, email: &str) -> StoreResult<User> {
        let start = Instant::now();

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await;

        let duration_ms = start.elapsed().as_millis() as u64;
        match result {
            Ok(Some(model)) => {
                info!(layer = "repository", email, duration_ms, "user found by email");
                Ok(User::from(model))
            }
            Ok(None) => {
                warn!(layer = "repository", email, duration_ms, "user not found by email");
                Err(StoreError::NotFound)
            }
            Err(e) => {
                error!(layer = "repository", email, error = %e, "failed to find user by email");
                Err(store_error(e))
            }
        }
    }

    async fn get_user_by_id(&self, id: Uuid) -> StoreResult<User> {
        let start = Instant::now();

        let result = UserEntity::find_by_id(id).one(&self.db).await;

        let duration_ms = start.elapsed().as_millis() as u64;
        match result {
            Ok(Some(model)) => {
                info!(layer = "repository", user_id = %id, duration_ms, "user found by id");
                Ok(User::from(model))
            }
            Ok(None) => {
                warn!(layer = "repository", user_id = %id, duration_ms, "user not found by id");
                Err(StoreError::NotFound)
            }
            Err(e) => {
                error!(layer = "repository", user_id = %id, error = %e, "failed to find user by id");
                Err(store_error(e))
            }
        }
    }

    async fn create_user(&self, user: &User) -> StoreResult<()> {
        let start = Instant::now();

        let active_model = ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        };

        let result = UserEntity::insert(active_model)
            .exec_without_returning(&self.db)
            .await;

        let duration_ms = start.elapsed().as_millis() as u64;
        match result {
            Ok(_) => {
                info!(
                    layer = "repository",
                    email = %user.email,
                    user_id = %user.id,
                    duration_ms,
                    "user created successfully"
                );
                Ok(())
            }
            Err(e) => {
                error!(
                    layer = "repository",
                    email = %user.email,
                    error = %e,
                    duration_ms,
                    "failed to create user"
                );
                Err(store_error(e))
            }
        }
    }
}
