//! Persisted "was connected" flag

use medledger_core::{StorageEffects, StorageError};
use std::sync::Arc;

const SET_VALUE: &[u8] = b"true";

/// Boolean flag persisted across restarts
///
/// The flag is set only when the stored value is exactly `"true"`; any
/// other stored value reads as unset.
#[derive(Clone)]
pub struct PersistedFlag {
    storage: Arc<dyn StorageEffects>,
    key: String,
}

impl PersistedFlag {
    /// Create a flag stored under `key`
    pub fn new(storage: Arc<dyn StorageEffects>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// Storage key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the flag is set
    pub async fn is_set(&self) -> Result<bool, StorageError> {
        let value = self.storage.retrieve(&self.key).await?;
        Ok(value.as_deref() == Some(SET_VALUE))
    }

    /// Set the flag
    pub async fn set(&self) -> Result<(), StorageError> {
        self.storage.store(&self.key, SET_VALUE.to_vec()).await
    }

    /// Clear the flag
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(&self.key).await.map(|_| ())
    }
}

impl std::fmt::Debug for PersistedFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedFlag")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
