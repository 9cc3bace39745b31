//! Key-value backends.
//!
//! [`MemoryStore`] keeps entries in process memory and backs the tests.
//! [`FileStore`] persists every entry in one JSON object on disk, rewritten
//! atomically (temp file, fsync, rename) on each mutation.

use super::error::StoreError;
use chrono::Local;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// String-to-string durable storage.
pub trait KeyValueStore: Send {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// All keys currently stored, sorted.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// Store handle shared between the engine and the widgets it hosts.
pub type SharedStore = Arc<Mutex<dyn KeyValueStore>>;

/// Wraps a backend into a [`SharedStore`].
pub fn shared<S: KeyValueStore + 'static>(store: S) -> SharedStore {
    Arc::new(Mutex::new(store))
}

/// Locks a shared store, recovering from poisoning.
pub fn lock(store: &SharedStore) -> MutexGuard<'_, dyn KeyValueStore + 'static> {
    store.lock().unwrap_or_else(|e| e.into_inner())
}

/// In-memory store; contents are lost when dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with `entries`.
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// JSON-file store.
///
/// The whole file is loaded on open and rewritten on every `set`/`remove`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens (or lazily creates) the store at `path`.
    ///
    /// A missing file is an empty store. A file that is not a JSON object of
    /// strings is renamed to `<name>.corrupt.<timestamp>` and replaced by an
    /// empty store so a damaged file never blocks startup.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    quarantine(&path, &e.to_string())?;
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StoreError::Read { path, source }),
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "opened storage");
        Ok(Self { path, entries })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `entries` to disk atomically. The in-memory map is only
    /// replaced by callers once this succeeds.
    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| StoreError::Serialize(e.to_string()))?;
        write_atomic(&self.path, &json)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut next = self.entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.flush(&next)?;
        self.entries = next;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut next = self.entries.clone();
        next.remove(key);
        self.flush(&next)?;
        self.entries = next;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// Moves an unreadable storage file out of the way.
fn quarantine(path: &Path, message: &str) -> Result<(), StoreError> {
    let timestamp = Local::now().format("%Y%m%d-%H%M%S");
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "storage.json".to_string());
    let aside = path.with_file_name(format!("{file_name}.corrupt.{timestamp}"));
    fs::rename(path, &aside).map_err(|_| StoreError::Corrupt {
        path: path.to_path_buf(),
        message: message.to_string(),
    })?;
    tracing::warn!(
        path = %path.display(),
        moved_to = %aside.display(),
        "storage file was malformed ({}), starting empty",
        message
    );
    Ok(())
}

/// Write `content` to `path` via a uniquely named temp file in the same
/// directory, fsync and rename.
///
/// If the final rename fails the temp file is kept as a safety copy.
fn write_atomic(path: &Path, content: &str) -> Result<(), StoreError> {
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
            parent.to_path_buf()
        }
        None => PathBuf::from("."),
    };

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "storage.json".to_string());
    let prefix = format!("{file_name}.tmp.");
    let mut temp = tempfile::Builder::new()
        .prefix(&prefix)
        .tempfile_in(&dir)
        .map_err(|source| StoreError::Write {
            path: dir.clone(),
            source,
        })?;

    temp.write_all(content.as_bytes()).map_err(|source| StoreError::Write {
        path: temp.path().to_path_buf(),
        source,
    })?;
    temp.as_file().sync_all().map_err(|source| StoreError::Write {
        path: temp.path().to_path_buf(),
        source,
    })?;

    temp.persist(path).map(|_| ()).map_err(|e| {
        let temp_path = e.file.path().to_path_buf();
        if let Err(keep) = e.file.keep() {
            tracing::warn!(
                path = %temp_path.display(),
                "could not keep safety copy: {}",
                keep.error
            );
        }
        StoreError::WriteAtomic {
            path: path.to_path_buf(),
            temp_path,
        }
    })
}
