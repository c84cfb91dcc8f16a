//! Browser `localStorage` handler
//!
//! Values are stored as UTF-8 strings, which is all `localStorage` holds.
//! The storage object is looked up on every call and never held across an
//! await point.

use async_trait::async_trait;
use medledger_core::effects::{StorageEffects, StorageError};
use wasm_bindgen::JsValue;

fn describe(error: JsValue) -> String {
    error.as_string().unwrap_or_else(|| format!("{error:?}"))
}

/// Browser `localStorage` handler
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageHandler;

impl LocalStorageHandler {
    /// Create a handler
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window object".to_string()))?;
        window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("localStorage access denied: {}", describe(e))))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))
    }
}

#[async_trait]
impl StorageEffects for LocalStorageHandler {
    async fn store(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let text = String::from_utf8(value)
            .map_err(|e| StorageError::WriteFailed(format!("value is not UTF-8: {e}")))?;
        Self::storage()?
            .set_item(key, &text)
            .map_err(|e| StorageError::WriteFailed(format!("setItem failed for {key}: {}", describe(e))))
    }

    async fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Self::storage()?
            .get_item(key)
            .map(|item| item.map(String::into_bytes))
            .map_err(|e| StorageError::ReadFailed(format!("getItem failed for {key}: {}", describe(e))))
    }

    async fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let storage = Self::storage()?;
        let existed = storage
            .get_item(key)
            .map_err(|e| StorageError::ReadFailed(format!("getItem failed for {key}: {}", describe(e))))?
            .is_some();
        storage
            .remove_item(key)
            .map_err(|e| StorageError::DeleteFailed(format!("removeItem failed for {key}: {}", describe(e))))?;
        Ok(existed)
    }
}
