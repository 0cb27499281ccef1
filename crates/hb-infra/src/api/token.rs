use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use hb_core::ports::{KeyValueStorePort, StorageError};
use hb_core::storage_keys::AUTH_TOKEN;

/// Bearer token cached in memory and mirrored to device storage.
///
/// The value is stored raw, not JSON-encoded.
pub(crate) struct BearerToken {
    kv: Arc<dyn KeyValueStorePort>,
    current: RwLock<Option<String>>,
}

impl BearerToken {
    pub(crate) fn new(kv: Arc<dyn KeyValueStorePort>) -> Self {
        Self {
            kv,
            current: RwLock::new(None),
        }
    }

    /// Reload the cached token from storage.
    pub(crate) async fn load(&self) -> Result<Option<String>, StorageError> {
        let stored = self
            .kv
            .get(AUTH_TOKEN)
            .await?
            .filter(|token| !token.is_empty());
        debug!(present = stored.is_some(), "loaded bearer token");
        *self.current.write().await = stored.clone();
        Ok(stored)
    }

    pub(crate) async fn current(&self) -> Option<String> {
        self.current.read().await.clone()
    }

    /// Persist `token`, or clear the stored one when `None`.
    pub(crate) async fn store(&self, token: Option<&str>) -> Result<(), StorageError> {
        match token {
            Some(token) => self.kv.set(AUTH_TOKEN, token).await?,
            None => self.kv.remove(AUTH_TOKEN).await?,
        }
        *self.current.write().await = token.map(str::to_string);
        Ok(())
    }

    pub(crate) async fn clear(&self) -> Result<(), StorageError> {
        self.store(None).await
    }
}
