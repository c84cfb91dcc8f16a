//! Storage that can hold writes open
//!
//! Wraps a [`MemoryStorageHandler`] so a test can suspend the next `store`
//! and run session transitions while the flag write is pending.

use crate::wallet::RequestGate;
use async_trait::async_trait;
use futures::channel::oneshot;
use medledger_core::effects::{StorageEffects, StorageError};
use medledger_effects::MemoryStorageHandler;
use parking_lot::Mutex;
use std::sync::Arc;

/// Memory storage whose writes can be paused
///
/// Clones share state.
#[derive(Debug, Clone, Default)]
pub struct GatedStorage {
    inner: MemoryStorageHandler,
    store_gate: Arc<Mutex<Option<oneshot::Receiver<()>>>>,
}

impl GatedStorage {
    /// Gate writes to `inner`
    pub fn new(inner: MemoryStorageHandler) -> Self {
        Self {
            inner,
            store_gate: Arc::default(),
        }
    }

    /// Pause the next `store` until the gate is released
    pub fn pause_next_store(&self) -> RequestGate {
        let (release, wait) = oneshot::channel();
        *self.store_gate.lock() = Some(wait);
        RequestGate::new(release)
    }

    /// Underlying storage
    pub fn inner(&self) -> &MemoryStorageHandler {
        &self.inner
    }
}

#[async_trait]
impl StorageEffects for GatedStorage {
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let gate = self.store_gate.lock().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.inner.store(key, value).await
    }

    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.inner.retrieve(key).await
    }

    async fn remove(&self, key: &str) -> Result<bool, StorageError> {
        self.inner.remove(key).await
    }
}
