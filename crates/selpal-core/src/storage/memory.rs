//! In-memory preference storage.

use super::{PreferenceStorage, Preferences, StorageError, StorageResult};
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory storage for testing and ephemeral use.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    entries: RefCell<HashMap<String, Preferences>>,
}

impl MemoryPreferences {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStorage for MemoryPreferences {
    fn save(&self, key: &str, preferences: &Preferences) -> StorageResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), *preferences);
        Ok(())
    }

    fn load(&self, key: &str) -> StorageResult<Preferences> {
        self.entries
            .borrow()
            .get(key)
            .copied()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
