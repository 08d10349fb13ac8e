use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

use crate::model::activity::ActivityLog;
use crate::model::task::Task;

/// Error type for the key-value store
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not serialize {key}: {source}")]
    SerializeError {
        key: String,
        source: serde_json::Error,
    },
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
}

/// String values stored under string keys, whole-value reads and writes only.
pub trait KeyValueStore {
    /// The stored value, or `None` if the key was never written or cannot be read.
    fn get(&self, key: &str) -> Option<String>;
    /// Overwrite the value under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DirStore { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for DirStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key).ok()?;
        fs::read_to_string(path).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        atomic_write(&path, value.as_bytes()).map_err(|source| StorageError::WriteError {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(key, path = %path.display(), bytes = value.len(), "stored value");
        Ok(())
    }
}

/// In-memory store for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Read a JSON value. Absent and unparseable values both yield `None`.
fn load_json<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "stored value unreadable, starting empty");
            None
        }
    }
}

fn save_json<T: Serialize + ?Sized>(
    store: &impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value).map_err(|source| StorageError::SerializeError {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &json)
}

/// Initial task list: the stored list, or empty if missing or unreadable.
pub fn load_tasks(store: &impl KeyValueStore, key: &str) -> Vec<Task> {
    load_json(store, key).unwrap_or_default()
}

/// Overwrite the stored task list with `tasks`.
pub fn save_tasks(store: &impl KeyValueStore, key: &str, tasks: &[Task]) -> Result<(), StorageError> {
    save_json(store, key, tasks)
}

pub fn load_activity(store: &impl KeyValueStore, key: &str) -> ActivityLog {
    load_json(store, key).unwrap_or_default()
}

pub fn save_activity(
    store: &impl KeyValueStore,
    key: &str,
    log: &ActivityLog,
) -> Result<(), StorageError> {
    save_json(store, key, log)
}
