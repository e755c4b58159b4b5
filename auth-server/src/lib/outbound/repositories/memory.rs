use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::account::errors::StoreError;
use crate::domain::account::models::CredentialRecord;
use crate::domain::account::ports::UserStore;

/// Process-local credential store, used when no database is configured.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    records: RwLock<HashMap<String, CredentialRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<CredentialRecord>, StoreError> {
        Ok(self.records.read().await.get(username).cloned())
    }

    async fn save(&self, record: CredentialRecord) -> Result<(), StoreError> {
        match self.records.write().await.entry(record.username.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(record.username)),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }
}
