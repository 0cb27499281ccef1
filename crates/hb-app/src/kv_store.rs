//! JSON values over the raw key-value port.
//!
//! Reads never fail on bad data: a value that does not deserialize is
//! logged and treated as absent so a corrupt entry cannot block start-up.
//! Device I/O failures still propagate.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{error, warn};

use hb_core::ports::{KeyValueStorePort, StorageError};

#[derive(Clone)]
pub struct PersistentStore {
    kv: Arc<dyn KeyValueStorePort>,
}

impl PersistentStore {
    pub fn new(kv: Arc<dyn KeyValueStorePort>) -> Self {
        Self { kv }
    }

    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|e| StorageError::Serialize {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        self.kv.set(key, &raw).await.inspect_err(|e| {
            error!(key, error = %e, "storage write failed");
        })
    }

    /// `None` when the key is absent or its value does not deserialize.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.kv.get(key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "discarding undecodable stored value");
                Ok(None)
            }
        }
    }

    pub async fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, StorageError> {
        Ok(self.get(key).await?.unwrap_or(default))
    }

    /// Read a value stored verbatim, without JSON decoding.
    pub async fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.kv.get(key).await
    }

    pub async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.kv.remove(key).await
    }

    pub async fn clear(&self) -> Result<(), StorageError> {
        self.kv.clear().await
    }

    pub async fn keys(&self) -> Result<Vec<String>, StorageError> {
        self.kv.keys().await
    }

    /// Total size in bytes of every stored value.
    pub async fn size(&self) -> Result<usize, StorageError> {
        let mut total = 0;
        for key in self.kv.keys().await? {
            if let Some(raw) = self.kv.get(&key).await? {
                total += raw.len();
            }
        }
        Ok(total)
    }
}
