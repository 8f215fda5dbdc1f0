//! Key-value storage backends. Values are whole JSON documents.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StorageError;

/// Durable key-value storage.
pub trait KeyValueStore {
    /// Read a value, `None` if the key was never written.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite a value.
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store for tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Number of `save` calls so far.
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.saves += 1;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-based store: one `{key}.json` file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default data directory: ~/.pantry
    pub fn default_dir() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".pantry"))
            .unwrap_or_else(|| PathBuf::from("data"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            key: key.to_string(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(io_err)?;
        fs::write(self.path_for(key), value).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_missing_key() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.load("nothing").unwrap(), None);
    }

    #[test]
    fn test_file_store_creates_directory() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::new(dir.path().join("nested").join("data"));

        store.save("wishlistRecipes", "[]").unwrap();
        assert_eq!(store.load("wishlistRecipes").unwrap().as_deref(), Some("[]"));
        assert!(store.dir().join("wishlistRecipes.json").exists());
    }

    #[test]
    fn test_memory_store_counts_saves() {
        let mut store = MemoryStore::new();
        store.save("a", "1").unwrap();
        store.save("a", "2").unwrap();
        assert_eq!(store.get("a"), Some("2"));
        assert_eq!(store.save_count(), 2);
    }
}
