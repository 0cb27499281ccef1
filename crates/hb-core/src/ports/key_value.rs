//! Key-value storage port
//!
//! Device-local, string-keyed, string-valued persistence. Implementations
//! live in the infrastructure layer (file-backed, in-memory). JSON
//! encoding is the application layer's job; this port moves raw strings.

use async_trait::async_trait;

use crate::ports::errors::StorageError;

#[async_trait]
pub trait KeyValueStorePort: Send + Sync {
    /// Read the raw value stored under `key`, `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Durably write `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Delete every key in this store's namespace.
    async fn clear(&self) -> Result<(), StorageError>;

    /// List every key in this store's namespace.
    async fn keys(&self) -> Result<Vec<String>, StorageError>;
}
