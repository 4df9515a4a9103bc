//! In-memory account store.
//!
//! Used by tests and by `serve --in-memory`. Records live for the lifetime
//! of the process.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use domain::{AccountStore, StoreError, StoreResult, User};

#[derive(Default)]
struct Records {
    by_id: HashMap<Uuid, User>,
    /// email -> id
    emails: HashMap<String, Uuid>,
}

/// Account store keeping records in process memory.
///
/// The uniqueness check and the insert happen under one write lock, so two
/// concurrent `create_user` calls for the same email never both succeed.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<Records>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove a user. Not part of [`AccountStore`]; used to simulate
    /// accounts disappearing underneath issued tokens.
    pub async fn delete_user(&self, id: Uuid) -> StoreResult<()> {
        let mut records = self.records.write().await;
        let user = records.by_id.remove(&id).ok_or(StoreError::NotFound)?;
        records.emails.remove(&user.email);
        Ok(())
    }

    /// Number of stored users.
    pub async fn len(&self) -> usize {
        self.records.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn get_user_by_email(&self, email: &str) -> StoreResult<User> {
        let records = self.records.read().await;
        records
            .emails
            .get(email)
            .and_then(|id| records.by_id.get(id))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_user_by_id(&self, id: Uuid) -> StoreResult<User> {
        let records = self.records.read().await;
        records.by_id.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn create_user(&self, user: &User) -> StoreResult<()> {
        let mut records = self.records.write().await;
        if records.emails.contains_key(&user.email) || records.by_id.contains_key(&user.id) {
            return Err(StoreError::Duplicate);
        }

        records.emails.insert(user.email.clone(), user.id);
        records.by_id.insert(user.id, user.clone());
        Ok(())
    }
}
