use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tempfile::NamedTempFile;

/// Error type for the durable key-value medium
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not encode store contents: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// String key-value storage the activity list is persisted into
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), PersistenceError>;
}

impl<K: KeyValueStore + ?Sized> KeyValueStore for Box<K> {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), PersistenceError> {
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

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// All keys in one JSON object file, rewritten in full on every `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: IndexMap<String, String>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store. A file
    /// that is not a JSON object of strings is moved aside to `<path>.bak`
    /// and the store starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();
        if !path.exists() {
            return Ok(FileStore {
                path,
                entries: IndexMap::new(),
            });
        }

        let content = fs::read_to_string(&path).map_err(|e| PersistenceError::ReadError {
            path: path.clone(),
            source: e,
        })?;
        let entries = match serde_json::from_str::<IndexMap<String, String>>(&content) {
            Ok(entries) => entries,
            Err(e) => {
                let backup = path.with_extension("json.bak");
                tracing::warn!(path = %path.display(), backup = %backup.display(), error = %e, "store file is corrupt, starting empty");
                fs::rename(&path, &backup).map_err(|e| PersistenceError::WriteError {
                    path: backup.clone(),
                    source: e,
                })?;
                IndexMap::new()
            }
        };
        Ok(FileStore { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), PersistenceError> {
        let mut next = self.entries.clone();
        next.insert(key.to_string(), value);
        let content = serde_json::to_string_pretty(&next)?;
        atomic_write(&self.path, content.as_bytes()).map_err(|e| PersistenceError::WriteError {
            path: self.path.clone(),
            source: e,
        })?;
        self.entries = next;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Volatile store. `fail_writes` makes every `set` fail, to exercise the
/// non-fatal persistence path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: IndexMap<String, String>,
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: impl Into<String>) -> Self {
        let mut store = MemoryStore::new();
        store.entries.insert(key.to_string(), value.into());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), PersistenceError> {
        if self.fail_writes {
            return Err(PersistenceError::Unavailable("writes disabled".into()));
        }
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}
