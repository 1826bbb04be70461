//! Key-value preference storage.
//!
//! Holds small opaque strings such as the PIN hash and the selected theme
//! id. The file-backed store keeps a flat TOML table and rewrites it
//! atomically on every change.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::error::{JournalError, Result};
use crate::fs::write_atomic;

/// Durable string key-value storage.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Returns whether it was present.
    fn remove(&self, key: &str) -> Result<bool>;

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Preferences persisted to a TOML file.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| JournalError::Storage("Preference lock poisoned".to_string()))
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            JournalError::Storage(format!(
                "Failed to read preferences {}: {}",
                self.path.display(),
                e
            ))
        })?;
        toml::from_str(&contents).map_err(|e| {
            JournalError::Config(format!(
                "Failed to parse preferences {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let contents = toml::to_string(values)?;
        write_atomic(&self.path, contents.as_bytes())
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.guard()?;
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.guard()?;
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let _guard = self.guard()?;
        let mut values = self.read_all()?;
        let existed = values.remove(key).is_some();
        if existed {
            self.write_all(&values)?;
        }
        Ok(existed)
    }
}

/// Volatile preferences, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>> {
        self.values
            .lock()
            .map_err(|_| JournalError::Storage("Preference lock poisoned".to_string()))
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.values()?.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_preferences_round_trip_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.toml");

        let prefs = FilePreferences::new(&path);
        assert_eq!(prefs.get("app_theme").unwrap(), None);
        prefs.set("app_theme", "dark-ocean").unwrap();
        prefs.set("journal_pin_hash", "abc+/=").unwrap();

        let reopened = FilePreferences::new(&path);
        assert_eq!(
            reopened.get("app_theme").unwrap().as_deref(),
            Some("dark-ocean")
        );
        assert!(reopened.contains("journal_pin_hash").unwrap());
    }

    #[test]
    fn test_file_preferences_remove() {
        let dir = tempdir().unwrap();
        let prefs = FilePreferences::new(dir.path().join("p.toml"));
        prefs.set("k", "v").unwrap();

        assert!(prefs.remove("k").unwrap());
        assert!(!prefs.remove("k").unwrap());
        assert!(!prefs.contains("k").unwrap());
    }

    #[test]
    fn test_corrupt_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("p.toml");
        std::fs::write(&path, "not = [valid").unwrap();

        let prefs = FilePreferences::new(&path);
        assert!(matches!(prefs.get("k"), Err(JournalError::Config(_))));
    }

    #[test]
    fn test_memory_preferences() {
        let prefs = MemoryPreferences::new();
        prefs.set("a", "1").unwrap();
        assert_eq!(prefs.get("a").unwrap().as_deref(), Some("1"));
        assert!(prefs.remove("a").unwrap());
        assert_eq!(prefs.get("a").unwrap(), None);
    }
}
