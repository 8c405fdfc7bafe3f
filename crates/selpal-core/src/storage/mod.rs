//! Persistence of palette preferences.

mod file;
mod memory;

pub use file::FilePreferences;
pub use memory::MemoryPreferences;

use crate::selection::SelectionOperation;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Key the selection palette stores its preferences under.
pub const PALETTE_PREFERENCES_KEY: &str = "selection_palette";

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Preferences not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Palette state that outlives a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// The last-clicked operation mode.
    #[serde(default)]
    pub armed_operation: SelectionOperation,
}

/// Trait for preference storage backends.
///
/// Calls are synchronous; they run on the interaction thread between events.
pub trait PreferenceStorage {
    /// Save preferences under `key`.
    fn save(&self, key: &str, preferences: &Preferences) -> StorageResult<()>;

    /// Load preferences stored under `key`.
    fn load(&self, key: &str) -> StorageResult<Preferences>;

    /// Delete preferences stored under `key`. Missing entries are not an error.
    fn delete(&self, key: &str) -> StorageResult<()>;
}
