use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::UserRecord;
use super::store::{StoreError, UserStore};

/// In-process store keyed by email. Rejects duplicate emails the way the
/// unique index on `users.email` does.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_one_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn find_one_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn insert_one(&self, user: &UserRecord) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Err(StoreError::Duplicate);
        }
        users.insert(user.email.clone(), user.clone());
        Ok(())
    }
}

/// Store whose backend is always down.
pub struct UnavailableUserStore;

#[async_trait]
impl UserStore for UnavailableUserStore {
    async fn find_one_by_email(&self, _email: &str) -> Result<Option<UserRecord>, StoreError> {
        Err(anyhow::anyhow!("connection refused").into())
    }

    async fn find_one_by_id(&self, _id: Uuid) -> Result<Option<UserRecord>, StoreError> {
        Err(anyhow::anyhow!("connection refused").into())
    }

    async fn insert_one(&self, _user: &UserRecord) -> Result<(), StoreError> {
        Err(anyhow::anyhow!("connection refused").into())
    }
}
