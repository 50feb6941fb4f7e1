//! Persisted launcher settings.
//!
//! A flat key/value store backed by a JSON file under the application data
//! root. The session validator clears the persisted user through this store
//! when a session expires; the credential manager mirrors the saved login
//! and remember flag here for its keychain fallback path.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// Settings file name under the data root
const SETTINGS_FILE: &str = "settings.json";

/// Well-known settings keys.
pub mod keys {
    /// The persisted authenticated user (cleared on session expiry)
    pub const CURRENT_USER: &str = "current-user";

    /// Login mirrored for the keychain credential fallback
    pub const SAVED_LOGIN: &str = "saved-login";

    /// Remember flag mirrored for the keychain credential fallback
    pub const REMEMBER_ME: &str = "remember-me";
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no user data directory available on this platform")]
    NoDataDir,
}

/// Key/value settings persistence.
///
/// `set(key, None)` removes the key. Implementations must be safe to share
/// across threads; the validator calls `set` from its timer task.
pub trait SettingsStore: Send + Sync {
    fn set(&self, key: &str, value: Option<Value>) -> Result<(), StorageError>;
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;
}

/// File-backed settings store.
pub struct JsonSettings {
    path: PathBuf,
    values: Mutex<Map<String, Value>>,
}

impl JsonSettings {
    /// Open (or create) the settings file under the given data root.
    pub fn open(data_root: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(data_root)?;
        let path = data_root.join(SETTINGS_FILE);

        let values = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Map::new()
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// Write through a temp file and rename so a crash mid-write never
    /// leaves a half-written settings file behind.
    fn persist(&self, values: &Map<String, Value>) -> Result<(), StorageError> {
        let contents = serde_json::to_string_pretty(values)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SettingsStore for JsonSettings {
    fn set(&self, key: &str, value: Option<Value>) -> Result<(), StorageError> {
        let mut values = self.values.lock().unwrap();
        match value {
            Some(value) => {
                values.insert(key.to_string(), value);
            }
            None => {
                if values.remove(key).is_none() {
                    return Ok(());
                }
                debug!(key, "settings key removed");
            }
        }
        self.persist(&values)
    }

    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }
}

/// In-memory settings store for tests and previews.
#[derive(Default)]
pub struct MemorySettings {
    values: Mutex<Map<String, Value>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettings {
    fn set(&self, key: &str, value: Option<Value>) -> Result<(), StorageError> {
        let mut values = self.values.lock().unwrap();
        match value {
            Some(value) => {
                values.insert(key.to_string(), value);
            }
            None => {
                values.remove(key);
            }
        }
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let settings = JsonSettings::open(dir.path()).unwrap();

        settings.set(keys::SAVED_LOGIN, Some(json!("alice@x.com"))).unwrap();
        assert_eq!(
            settings.get(keys::SAVED_LOGIN).unwrap(),
            Some(json!("alice@x.com"))
        );
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let settings = JsonSettings::open(dir.path()).unwrap();
            settings.set(keys::REMEMBER_ME, Some(json!(true))).unwrap();
        }
        let settings = JsonSettings::open(dir.path()).unwrap();
        assert_eq!(settings.get(keys::REMEMBER_ME).unwrap(), Some(json!(true)));
    }

    #[test]
    fn test_set_none_removes_key() {
        let dir = tempfile::tempdir().unwrap();
        let settings = JsonSettings::open(dir.path()).unwrap();

        settings.set(keys::CURRENT_USER, Some(json!({"name": "alice"}))).unwrap();
        settings.set(keys::CURRENT_USER, None).unwrap();
        assert_eq!(settings.get(keys::CURRENT_USER).unwrap(), None);

        // Removing an absent key is a no-op, not an error
        settings.set(keys::CURRENT_USER, None).unwrap();
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let settings = JsonSettings::open(dir.path()).unwrap();
        assert_eq!(settings.get("anything").unwrap(), None);
    }
}
