//! Key/value storage helpers (`localStorage`/`sessionStorage`)

use std::collections::HashMap;

use crate::host::Source;

/// Error type for storage writes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("Storage quota exceeded while writing '{0}'")]
    QuotaExceeded(String),
}

/// The subset of the Web Storage API the scriptlets use.
pub trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Write `key` = `value`, logging instead of failing when the storage refuses.
pub fn set_storage_item(source: &Source, storage: &mut dyn Storage, key: &str, value: &str) {
    if let Err(e) = storage.set_item(key, value) {
        source.log_message(&format!("Unable to set storage item due to: {e}"));
    }
}

// =============================================================================
// In-memory Storage
// =============================================================================

/// In-memory storage with an optional quota over key + value bytes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            items: HashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.items
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota_bytes {
            if self.used_bytes_without(key) + key.len() + value.len() > quota {
                return Err(StorageError::QuotaExceeded(key.to_string()));
            }
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
