//! Named persisted values, one JSON document per key.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use directories::ProjectDirs;
use serde_json::Error as SerdeError;
use tracing::{debug, warn};

use crate::domain::ViewMode;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "FreightDesk";
const APP_NAME: &str = "FreightDesk";

pub const SHIPMENTS_KEY: &str = "shipments";
pub const VIEW_MODE_KEY: &str = "shipmentHistoryViewMode";
pub const TOKEN_KEY: &str = "token";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage directory unavailable")]
    StorageUnavailable,
    #[error("storage is full ({needed} bytes needed, {available} available)")]
    Full { needed: usize, available: usize },
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}

/// String values addressed by name, in the spirit of browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Platform data directory for the app, if the OS exposes one.
pub fn default_data_dir() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME).map(|dirs| dirs.data_dir().to_path_buf())
}

/// Keeps each key in `<root>/<key>.json`. Writes go through a temporary file
/// and a rename so readers never observe a half-written value.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root)?;
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value)?;
        if let Err(err) = fs::rename(&staging, &path) {
            let _ = fs::remove_file(&staging);
            return Err(err.into());
        }
        debug!(key, bytes = value.len(), path = %path.display(), "persisted value");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    values: HashMap<String, String>,
    capacity: Option<usize>,
}

impl MemoryInner {
    fn used_without(&self, key: &str) -> usize {
        self.values
            .iter()
            .filter(|(name, _)| name.as_str() != key)
            .map(|(name, value)| name.len() + value.len())
            .sum()
    }
}

/// In-process store. Clones share the same values. An optional byte capacity
/// makes writes fail the way an exhausted browser quota does.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStore {
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            inner: Rc::new(RefCell::new(MemoryInner {
                values: HashMap::new(),
                capacity: Some(bytes),
            })),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.inner.borrow().values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.borrow_mut();
        if let Some(capacity) = inner.capacity {
            let needed = key.len() + value.len();
            let available = capacity.saturating_sub(inner.used_without(key));
            if needed > available {
                return Err(StorageError::Full { needed, available });
            }
        }
        inner.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.borrow_mut().values.remove(key);
        Ok(())
    }
}

pub fn load_view_mode(store: &impl KeyValueStore) -> ViewMode {
    match store.get(VIEW_MODE_KEY) {
        Ok(Some(raw)) => serde_json::from_str::<String>(&raw)
            .map(|value| ViewMode::parse_or_default(&value))
            .unwrap_or_else(|_| ViewMode::parse_or_default(&raw)),
        Ok(None) => ViewMode::default(),
        Err(err) => {
            warn!("failed to read view mode preference: {err}");
            ViewMode::default()
        }
    }
}

pub fn save_view_mode(store: &impl KeyValueStore, mode: ViewMode) -> Result<(), StorageError> {
    let json = serde_json::to_string(mode.as_str())?;
    store.set(VIEW_MODE_KEY, &json)
}

pub fn load_token(store: &impl KeyValueStore) -> Option<String> {
    match store.get(TOKEN_KEY) {
        Ok(Some(raw)) => serde_json::from_str::<String>(&raw)
            .ok()
            .filter(|token| !token.is_empty()),
        Ok(None) => None,
        Err(err) => {
            warn!("failed to read session token: {err}");
            None
        }
    }
}

pub fn save_token(store: &impl KeyValueStore, token: &str) -> Result<(), StorageError> {
    let json = serde_json::to_string(token)?;
    store.set(TOKEN_KEY, &json)
}

pub fn clear_token(store: &impl KeyValueStore) -> Result<(), StorageError> {
    store.remove(TOKEN_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_store_round_trips_and_removes() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        assert_eq!(store.get("shipments").unwrap(), None);
        store.set("shipments", "[1,2]").unwrap();
        assert_eq!(store.get("shipments").unwrap().as_deref(), Some("[1,2]"));
        assert!(dir.path().join("nested/shipments.json").exists());
        assert!(!dir.path().join("nested/shipments.json.tmp").exists());

        store.remove("shipments").unwrap();
        assert_eq!(store.get("shipments").unwrap(), None);
        store.remove("shipments").unwrap();
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.set("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(store.get(""), Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn memory_store_enforces_capacity() {
        let store = MemoryStore::with_capacity(12);
        store.set("a", "12345").unwrap();
        let err = store.set("b", "1234567").unwrap_err();
        assert!(matches!(err, StorageError::Full { .. }));
        assert_eq!(store.get("b").unwrap(), None);

        // Overwriting a key only counts its new size.
        store.set("a", "1234567890").unwrap();
    }

    #[test]
    fn memory_store_clones_share_values() {
        let store = MemoryStore::default();
        let other = store.clone();
        store.set("token", "\"abc\"").unwrap();
        assert_eq!(load_token(&other).as_deref(), Some("abc"));
    }

    #[test]
    fn view_mode_defaults_to_cards() {
        let store = MemoryStore::default();
        assert_eq!(load_view_mode(&store), ViewMode::Card);

        save_view_mode(&store, ViewMode::List).unwrap();
        assert_eq!(load_view_mode(&store), ViewMode::List);

        store.set(VIEW_MODE_KEY, "\"grid\"").unwrap();
        assert_eq!(load_view_mode(&store), ViewMode::Card);

        store.set(VIEW_MODE_KEY, "list").unwrap();
        assert_eq!(load_view_mode(&store), ViewMode::List);
    }

    #[test]
    fn token_presence_tracks_session() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(load_token(&store), None);

        save_token(&store, "jwt-value").unwrap();
        assert_eq!(load_token(&store).as_deref(), Some("jwt-value"));

        clear_token(&store).unwrap();
        assert_eq!(load_token(&store), None);
    }
}
