use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use hb_core::ports::{KeyValueStorePort, StorageError};

/// Process-local store; nothing survives a restart.
#[derive(Default)]
pub struct InMemoryKeyValueStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStorePort for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.entries.write().await.clear();
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.entries.read().await.keys().cloned().collect())
    }
}
