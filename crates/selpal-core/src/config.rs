//! Palette configuration.

use crate::selection::SelectionOperation;
use crate::storage::{
    FilePreferences, MemoryPreferences, PreferenceStorage, StorageError, StorageResult,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration read when the palette is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// Operation armed when no preference has been stored yet.
    #[serde(default)]
    pub default_operation: SelectionOperation,
    /// Whether the edit-menu items (grow, shrink, ...) are part of the view.
    #[serde(default = "default_install_menu_items")]
    pub install_menu_items: bool,
    /// Directory for persisted preferences. Preferences are kept in memory when unset.
    #[serde(default)]
    pub preferences_path: Option<PathBuf>,
}

fn default_install_menu_items() -> bool {
    true
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            default_operation: SelectionOperation::Add,
            install_menu_items: default_install_menu_items(),
            preferences_path: None,
        }
    }
}

impl PaletteConfig {
    /// Load configuration from a JSON file; missing fields take their defaults.
    pub fn load(path: &Path) -> StorageResult<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json).map_err(|e| {
            StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Load from `path`, or the default location when `path` is `None`.
    ///
    /// A missing file yields the default configuration.
    pub fn load_or_default(path: Option<&Path>) -> StorageResult<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_location() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// `<config dir>/selection-palette/config.json`
    pub fn default_location() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("selection-palette").join("config.json"))
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Build the preference backend this configuration asks for.
    pub fn preference_storage(&self) -> StorageResult<Box<dyn PreferenceStorage>> {
        match &self.preferences_path {
            Some(path) => Ok(Box::new(FilePreferences::new(path.clone())?)),
            None => Ok(Box::new(MemoryPreferences::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Preferences;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_for_missing_fields() {
        let config = PaletteConfig::from_json("{}").unwrap();
        assert_eq!(config, PaletteConfig::default());
        assert!(config.install_menu_items);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "default_operation": "intersect", "install_menu_items": false }"#,
        )
        .unwrap();

        let config = PaletteConfig::load(&path).unwrap();
        assert_eq!(config.default_operation, SelectionOperation::Intersect);
        assert!(!config.install_menu_items);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempdir().unwrap();
        let config = PaletteConfig::load_or_default(Some(&dir.path().join("absent.json"))).unwrap();
        assert_eq!(config, PaletteConfig::default());
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "default_operation": "xor" }"#).unwrap();
        assert!(matches!(
            PaletteConfig::load(&path),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn test_file_preference_storage() {
        let dir = tempdir().unwrap();
        let config = PaletteConfig {
            preferences_path: Some(dir.path().join("prefs")),
            ..PaletteConfig::default()
        };
        let storage = config.preference_storage().unwrap();
        storage.save("palette", &Preferences::default()).unwrap();
        assert!(dir.path().join("prefs").join("palette.json").exists());
    }
}
