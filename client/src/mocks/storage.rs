//! In-memory key-value store for testing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::mocks::poisoned;
use crate::providers::KeyValueStore;

/// In-memory key-value store.
///
/// Clones share the same map, so the store seeded into an environment can
/// be inspected from the test after effects ran against it.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Seed an entry, builder style.
    #[must_use]
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        self
    }

    /// Number of stored entries (for testing).
    ///
    /// # Errors
    ///
    /// Returns error if the lock is poisoned.
    pub fn len(&self) -> Result<usize> {
        Ok(self.entries.lock().map_err(|_| poisoned())?.len())
    }

    /// Returns `true` if the store has no entries.
    ///
    /// # Errors
    ///
    /// Returns error if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.entries.lock().map_err(|_| poisoned())?.is_empty())
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .entries
            .lock()
            .map_err(|_| poisoned())?
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .map_err(|_| poisoned())?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<()> {
        self.entries.lock().map_err(|_| poisoned())?.remove(key);
        Ok(())
    }
}
