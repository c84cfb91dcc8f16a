//! Filesystem storage handler
//!
//! Stores each key as `<base>/<key>.dat`. Used by native frontends to keep
//! the session flag across restarts the way a browser keeps `localStorage`.

use async_trait::async_trait;
use medledger_core::effects::{StorageEffects, StorageError};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Filesystem-based storage handler
#[derive(Debug, Clone)]
pub struct FilesystemStorageHandler {
    /// Base directory for storage files
    base_path: PathBuf,
}

impl FilesystemStorageHandler {
    /// Create a handler rooted at `base_path`
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Directory files are written to
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn file_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey {
                reason: "Key cannot be empty".to_string(),
            });
        }
        if key.contains(['/', '\\']) || key.contains("..") {
            return Err(StorageError::InvalidKey {
                reason: format!("Key must not contain path separators: {key}"),
            });
        }
        Ok(self.base_path.join(format!("{key}.dat")))
    }
}

#[async_trait]
impl StorageEffects for FilesystemStorageHandler {
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let file_path = self.file_for(key)?;
        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create directory: {e}"))
        })?;
        fs::write(&file_path, value)
            .await
            .map_err(|e| StorageError::WriteFailed(format!("Failed to write file: {e}")))?;
        tracing::trace!(key, path = %file_path.display(), "stored value");
        Ok(())
    }

    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let file_path = self.file_for(key)?;
        match fs::read(&file_path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadFailed(format!(
                "Failed to read file: {e}"
            ))),
        }
    }

    async fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let file_path = self.file_for(key)?;
        match fs::remove_file(&file_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::DeleteFailed(format!(
                "Failed to remove file: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_flag_survives_new_handler() {
        let dir = tempfile::tempdir().unwrap();
        let first = FilesystemStorageHandler::new(dir.path().join("session"));
        first.store("isWalletConnected", b"true".to_vec()).await.unwrap();

        let second = FilesystemStorageHandler::new(dir.path().join("session"));
        assert_eq!(
            second.retrieve("isWalletConnected").await.unwrap(),
            Some(b"true".to_vec())
        );
        assert!(second.remove("isWalletConnected").await.unwrap());
        assert_eq!(first.retrieve("isWalletConnected").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FilesystemStorageHandler::new(dir.path());
        assert_eq!(storage.retrieve("absent").await.unwrap(), None);
        assert!(!storage.remove("absent").await.unwrap());
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FilesystemStorageHandler::new(dir.path());
        assert!(matches!(
            storage.store("../escape", vec![1]).await,
            Err(StorageError::InvalidKey { .. })
        ));
    }
}
