//! File-backed key-value store
//!
//! One file per key under a single directory, which is the store's
//! namespace. File names are the hex-encoded key so any key is a valid
//! file name and `keys()` can decode it back. Writes go through a
//! temporary file and a rename, so a reader sees either the previous
//! value or the complete new one.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use hb_core::ports::{KeyValueStorePort, StorageError};

pub const DEFAULT_STORE_DIR: &str = "storage";

const VALUE_EXT: &str = "kv";
const TEMP_EXT: &str = "kv.tmp";

pub struct FileKeyValueStore {
    base_dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Store rooted at `<app_data_root>/storage`.
    pub fn with_defaults(app_data_root: &Path) -> Self {
        Self::new(app_data_root.join(DEFAULT_STORE_DIR))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir
            .join(format!("{}.{VALUE_EXT}", hex::encode(key.as_bytes())))
    }

    fn key_from_path(path: &Path) -> Option<String> {
        if path.extension()? != VALUE_EXT {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        let bytes = hex::decode(stem).ok()?;
        String::from_utf8(bytes).ok()
    }

    async fn list_value_files(&self) -> io::Result<Vec<(String, PathBuf)>> {
        let mut entries = match fs::read_dir(&self.base_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if let Some(key) = Self::key_from_path(&path) {
                files.push((key, path));
            }
        }
        files.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(files)
    }
}

#[async_trait]
impl KeyValueStorePort for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.file_path(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::read(key, e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| StorageError::write(key, format!("create store dir failed: {e}")))?;

        let path = self.file_path(key);
        let tmp_path = path.with_extension(TEMP_EXT);
        fs::write(&tmp_path, value)
            .await
            .map_err(|e| StorageError::write(key, format!("write temp file failed: {e}")))?;
        fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| StorageError::write(key, format!("rename temp file failed: {e}")))?;

        debug!(key, bytes = value.len(), "stored value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.file_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::write(key, e)),
        }
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let files = self
            .list_value_files()
            .await
            .map_err(|e| StorageError::write("*", e))?;

        for (key, path) in files {
            match fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(StorageError::write(&key, e)),
            }
        }
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        let files = self
            .list_value_files()
            .await
            .map_err(|e| StorageError::read("*", e))?;
        Ok(files.into_iter().map(|(key, _)| key).collect())
    }
}
