//! Local document persistence.
//!
//! The editor keeps exactly one document under a configurable key. A
//! [`DocumentStore`] is the seam between the runtime and whatever the host
//! offers: browser local storage, a directory on disk, or memory in tests.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `StorageError::Io` | File I/O failure | Returned, document in memory unaffected |
//! | `StorageError::Corruption` | Stored text is not a document | Load falls back to the default document |
//! | Missing entry | First run | Default document used |

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use mindmap_core::MindMapError;
use mindmap_model::{MapNode, default_document, parse_document};
use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Stored state is unusable.
    #[error("storage corruption: {0}")]
    Corruption(String),
    /// The backend cannot be used in this environment.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<StorageError> for MindMapError {
    fn from(err: StorageError) -> Self {
        MindMapError::storage(err.to_string())
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Key/value store holding serialized documents.
pub trait DocumentStore: Send + Sync {
    /// Human-readable backend name for logs.
    fn name(&self) -> &str;

    /// Stored text under `key`, `None` on first run.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    fn is_available(&self) -> bool {
        true
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.write() {
            entries.insert(key.into(), value.into());
        }
        store
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentStore for MemoryStore {
    fn name(&self) -> &str {
        "MemoryStore"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        entries.remove(key);
        Ok(())
    }
}

/// One JSON file per key inside a directory.
///
/// Writes go to `<key>.json.tmp` and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn validate_key(key: &str) -> StorageResult<()> {
        if key.is_empty() || key.contains(['/', '\\']) || key == "." || key == ".." {
            return Err(StorageError::Unavailable(format!("invalid storage key `{key}`")));
        }
        Ok(())
    }
}

impl DocumentStore for FileStore {
    fn name(&self) -> &str {
        "FileStore"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Self::validate_key(key)?;
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        Self::validate_key(key)?;
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &path)?;
        tracing::debug!(path = %path.display(), bytes = value.len(), "document saved");
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        Self::validate_key(key)?;
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn is_available(&self) -> bool {
        !self.dir.is_file()
    }
}

/// Read the stored document, or `None` if nothing usable is stored.
///
/// Corrupt entries are logged and treated as missing.
pub fn load_document(store: &dyn DocumentStore, key: &str) -> StorageResult<Option<MapNode>> {
    let Some(text) = store.get(key)? else {
        return Ok(None);
    };
    match parse_document(&text) {
        Ok(doc) => Ok(Some(doc)),
        Err(err) => {
            tracing::warn!(backend = store.name(), key, error = %err, "stored document is corrupt, ignoring");
            Ok(None)
        }
    }
}

/// Stored document, falling back to the default on any failure.
pub fn load_or_default(store: &dyn DocumentStore, key: &str, root_name: &str) -> MapNode {
    match load_document(store, key) {
        Ok(Some(doc)) => doc,
        Ok(None) => default_document(root_name),
        Err(err) => {
            tracing::warn!(backend = store.name(), error = %err, "storage read failed, using default document");
            default_document(root_name)
        }
    }
}

/// Serialize and store `document` under `key`.
pub fn save_document(store: &dyn DocumentStore, key: &str, document: &MapNode) -> StorageResult<()> {
    store.set(key, &document.to_json())
}
