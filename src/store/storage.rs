use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage format failure: {0}")]
    Format(#[from] serde_json::Error),
}

/// String key-value store behind the plan's persistence. Mirrors the
/// browser localStorage surface the plan originally lived in.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Single-file storage: one JSON object on disk mapping keys to string
/// values. Reads tolerate a missing file; writes replace the whole file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}
