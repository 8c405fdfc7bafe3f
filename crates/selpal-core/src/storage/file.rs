//! File-based preference storage.

use super::{PreferenceStorage, Preferences, StorageError, StorageResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each preference entry as a JSON file in a directory.
#[derive(Debug)]
pub struct FilePreferences {
    /// Base directory for preference files.
    base_path: PathBuf,
}

impl FilePreferences {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create preferences directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Get the file path for a key.
    fn entry_path(&self, key: &str) -> PathBuf {
        let safe_key: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe_key))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl PreferenceStorage for FilePreferences {
    fn save(&self, key: &str, preferences: &Preferences) -> StorageResult<()> {
        let path = self.entry_path(key);
        let json = serde_json::to_string_pretty(preferences)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        fs::write(&path, json)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }

    fn load(&self, key: &str) -> StorageResult<Preferences> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Err(StorageError::NotFound(key.to_string()));
        }

        let json = fs::read_to_string(&path)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&json).map_err(|e| {
            StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.entry_path(key);
        if path.exists() {
            fs::remove_file(&path).map_err(|e| {
                StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
            })?;
        }
        Ok(())
    }
}
