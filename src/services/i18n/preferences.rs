//! Persisted user preferences
//!
//! Stores share change notifications with every subscriber so that other
//! contexts using the same store (other tabs, other translators) can react
//! to a preference changing underneath them.

use log::warn;
use parking_lot::Mutex;
use std::{
    collections::{BTreeMap, HashMap},
    fs::{create_dir_all, read_to_string, write},
    io::ErrorKind,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tokio::sync::broadcast;

/// Capacity of the change notification channel
const EVENT_CAPACITY: usize = 16;

/// Notification that a stored preference changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    pub new_value: Option<String>,
}

/// Errors that can occur while persisting a preference
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to write preferences: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Preference store is read only")]
    ReadOnly,
}

/// Key value store for persisted preferences
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key` notifying subscribers on success.
    ///
    /// Called from inside a translate pass while the pass guard is held,
    /// so it must complete quickly and must not wait on other tasks
    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Subscribes to change notifications for this store
    fn subscribe(&self) -> broadcast::Receiver<StorageEvent>;
}

fn notify(events: &broadcast::Sender<StorageEvent>, key: &str, value: &str) {
    // Sending only fails when nobody is subscribed
    _ = events.send(StorageEvent {
        key: key.to_string(),
        new_value: Some(value.to_string()),
    });
}

/// Preferences held only in memory
pub struct MemoryPreferences {
    values: Mutex<HashMap<String, String>>,
    events: broadcast::Sender<StorageEvent>,
    read_only: bool,
}

impl Default for MemoryPreferences {
    fn default() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            values: Default::default(),
            events,
            read_only: false,
        }
    }
}

impl MemoryPreferences {
    /// Store that rejects every write, mirrors storage that
    /// has been disabled by the user
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Default::default()
        }
    }

    pub fn with(self, key: &str, value: &str) -> Self {
        self.values.lock().insert(key.to_string(), value.to_string());
        self
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        if self.read_only {
            return Err(PersistenceError::ReadOnly);
        }

        self.values.lock().insert(key.to_string(), value.to_string());
        notify(&self.events, key, value);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.events.subscribe()
    }
}

/// Preferences persisted to a JSON file on disk.
///
/// Every [PreferenceStore::set] rewrites the whole file synchronously,
/// which is only suitable for the small local files of a dev setup
pub struct FilePreferences {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
    events: broadcast::Sender<StorageEvent>,
}

impl FilePreferences {
    /// Opens the preferences file at `path`. A missing file starts empty,
    /// an unreadable or malformed file is logged and also starts empty
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = Self::read_values(&path);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            path,
            values: Mutex::new(values),
            events,
        }
    }

    fn read_values(path: &Path) -> BTreeMap<String, String> {
        let data = match read_to_string(path) {
            Ok(value) => value,
            Err(err) if err.kind() == ErrorKind::NotFound => return BTreeMap::new(),
            Err(err) => {
                warn!("Failed to read preferences file (Using defaults): {err}");
                return BTreeMap::new();
            }
        };

        match serde_json::from_str(&data) {
            Ok(value) => value,
            Err(err) => {
                warn!("Malformed preferences file (Using defaults): {err}");
                BTreeMap::new()
            }
        }
    }

    fn write_values(&self, values: &BTreeMap<String, String>) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }

        let data = serde_json::to_string_pretty(values)?;
        write(&self.path, data)?;
        Ok(())
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        {
            let values = &mut *self.values.lock();
            let previous = values.insert(key.to_string(), value.to_string());

            if let Err(err) = self.write_values(values) {
                // Keep memory consistent with what is on disk
                match previous {
                    Some(previous) => values.insert(key.to_string(), previous),
                    None => values.remove(key),
                };
                return Err(err);
            }
        }

        notify(&self.events, key, value);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod test {
    use super::{FilePreferences, MemoryPreferences, PersistenceError, PreferenceStore};

    #[test]
    fn test_memory_set_get() {
        let prefs = MemoryPreferences::default();
        assert!(prefs.get("preferredLanguage").is_none());

        prefs.set("preferredLanguage", "de").unwrap();
        assert_eq!(prefs.get("preferredLanguage").as_deref(), Some("de"));
    }

    #[test]
    fn test_memory_read_only() {
        let prefs = MemoryPreferences::read_only();
        let err = prefs.set("preferredLanguage", "de").unwrap_err();
        assert!(matches!(err, PersistenceError::ReadOnly));
        assert!(prefs.get("preferredLanguage").is_none());
    }

    #[test]
    fn test_set_notifies_subscribers() {
        let prefs = MemoryPreferences::default();
        let mut rx = prefs.subscribe();

        prefs.set("preferredLanguage", "es").unwrap();

        let event = rx.try_recv().unwrap();
        assert_eq!(event.key, "preferredLanguage");
        assert_eq!(event.new_value.as_deref(), Some("es"));
    }

    #[test]
    fn test_file_persists_across_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("preferences.json");

        let prefs = FilePreferences::open(&path);
        prefs.set("preferredLanguage", "de").unwrap();
        prefs.set("theme", "dark").unwrap();

        let reopened = FilePreferences::open(&path);
        assert_eq!(reopened.get("preferredLanguage").as_deref(), Some("de"));
        assert_eq!(reopened.get("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_file_malformed_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        std::fs::write(&path, "{not json").unwrap();

        let prefs = FilePreferences::open(&path);
        assert!(prefs.get("preferredLanguage").is_none());
    }

    /// Failed writes leave the in-memory value unchanged
    #[test]
    fn test_file_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        // Directory in place of the file makes the write fail
        let path = dir.path().join("preferences.json");
        std::fs::create_dir(&path).unwrap();

        let prefs = FilePreferences::open(&path);
        assert!(prefs.set("preferredLanguage", "de").is_err());
        assert!(prefs.get("preferredLanguage").is_none());
    }
}
