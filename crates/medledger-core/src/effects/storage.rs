//! Storage effect interface
//!
//! # Effect Classification
//!
//! - **Category**: Infrastructure Effect
//! - **Implementation**: `medledger-effects`
//! - **Usage**: persisting the "was connected" flag across restarts
//!
//! Values are opaque bytes keyed by string, mirroring browser
//! `localStorage` semantics.

use async_trait::async_trait;

/// Storage operation failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// Key was rejected by the backend
    #[error("invalid storage key: {reason}")]
    InvalidKey {
        /// Why the key was rejected
        reason: String,
    },
    /// Read failed
    #[error("storage read failed: {0}")]
    ReadFailed(String),
    /// Write failed
    #[error("storage write failed: {0}")]
    WriteFailed(String),
    /// Delete failed
    #[error("storage delete failed: {0}")]
    DeleteFailed(String),
    /// Backend is not reachable on this platform
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Key-value storage operations
#[async_trait]
pub trait StorageEffects: Send + Sync {
    /// Store a value under a key, replacing any previous value
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError>;

    /// Retrieve the value under a key
    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Remove a key, returning whether it existed
    async fn remove(&self, key: &str) -> Result<bool, StorageError>;
}
