//! File-based Key-Value Store Adapter
//!
//! Stores each key as its own file under a base directory, so the session id
//! and answered logs can be inspected by hand.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::ports::{KeyValueStore, StoreError};

const VALUE_EXTENSION: &str = "value";

/// File-backed key-value store
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    base_path: PathBuf,
}

impl FileKeyValueStore {
    /// Create a store rooted at `base_path`. The directory is created on
    /// first write.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Keys may only contain ASCII letters, digits, `.`, `_` and `-`, and may
    /// not start with a dot.
    fn validate_key(key: &str) -> Result<(), StoreError> {
        if key.is_empty() {
            return Err(StoreError::invalid_key(key, "key cannot be empty"));
        }
        if key.starts_with('.') {
            return Err(StoreError::invalid_key(key, "key cannot start with '.'"));
        }
        if let Some(c) = key
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
        {
            return Err(StoreError::invalid_key(
                key,
                format!("unsupported character {:?}", c),
            ));
        }
        Ok(())
    }

    fn value_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        Self::validate_key(key)?;
        Ok(self
            .base_path
            .join(format!("{}.{}", key, VALUE_EXTENSION)))
    }

    async fn ensure_dir(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| StoreError::IoError(e.to_string()))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.value_path(key)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::IoError(format!("{}: {}", path.display(), e))),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        let path = self.value_path(key)?;
        self.ensure_dir().await?;

        // Write to a sibling file first so readers never see a partial value
        let tmp_path = path.with_extension(format!("{}.tmp", VALUE_EXTENSION));
        fs::write(&tmp_path, value)
            .await
            .map_err(|e| StoreError::IoError(format!("{}: {}", tmp_path.display(), e)))?;
        fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| StoreError::IoError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let path = self.value_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::IoError(format!("{}: {}", path.display(), e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, FileKeyValueStore) {
        let dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("kv"));
        (dir, store)
    }

    #[tokio::test]
    async fn set_then_get_roundtrips_bytes() {
        let (_dir, store) = store();
        store.set("session_id", b"abc".to_vec()).await.unwrap();
        assert_eq!(store.get("session_id").await.unwrap(), Some(b"abc".to_vec()));
    }

    #[tokio::test]
    async fn missing_key_is_none() {
        let (_dir, store) = store();
        assert_eq!(store.get("answers.unknown").await.unwrap(), None);
    }

    #[tokio::test]
    async fn values_survive_a_new_store_instance() {
        let (dir, store) = store();
        store.set("answers.s1", b"[]".to_vec()).await.unwrap();

        let reopened = FileKeyValueStore::new(dir.path().join("kv"));
        assert_eq!(reopened.get("answers.s1").await.unwrap(), Some(b"[]".to_vec()));
    }

    #[tokio::test]
    async fn delete_removes_file_and_tolerates_missing() {
        let (_dir, store) = store();
        store.set("k", b"v".to_vec()).await.unwrap();
        store.delete("k").await.unwrap();
        store.delete("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn overwrite_leaves_no_temp_files() {
        let (_dir, store) = store();
        store.set("k", b"one".to_vec()).await.unwrap();
        store.set("k", b"two".to_vec()).await.unwrap();

        let mut entries = std::fs::read_dir(store.base_path()).unwrap();
        let name = entries.next().unwrap().unwrap().file_name();
        assert_eq!(name, "k.value");
        assert!(entries.next().is_none());
    }

    #[tokio::test]
    async fn rejects_path_traversal_keys() {
        let (_dir, store) = store();
        for key in ["", "../escape", ".hidden", "a/b", "a\\b"] {
            assert!(
                matches!(store.set(key, vec![]).await, Err(StoreError::InvalidKey { .. })),
                "key {:?} should be rejected",
                key
            );
        }
    }
}
