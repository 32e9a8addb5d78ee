// src/infrastructure/storage.rs
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::{debug, instrument, trace};

use crate::domain::error::DomainResult;
use crate::domain::repositories::key_value_store::KeyValueStore;
use crate::infrastructure::error::InfrastructureError;

/// Key-value store keeping one `<key>.json` file per key in a directory
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> DomainResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(InfrastructureError::Storage(format!("Invalid key: {:?}", key)).into());
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileKeyValueStore {
    #[instrument(skip(self), level = "trace")]
    fn get(&self, key: &str) -> DomainResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                trace!("No value stored for {}", key);
                Ok(None)
            }
            Err(e) => Err(InfrastructureError::FileSystem(format!(
                "Cannot read {}: {}",
                path.display(),
                e
            ))
            .into()),
        }
    }

    #[instrument(skip(self, value), level = "debug")]
    fn set(&self, key: &str, value: &str) -> DomainResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| {
            InfrastructureError::FileSystem(format!(
                "Cannot create {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        // write-then-rename so a crash never leaves a truncated value
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| {
                InfrastructureError::FileSystem(format!("Cannot write {}: {}", path.display(), e))
            })?;
        debug!("Stored {} bytes under {}", value.len(), key);
        Ok(())
    }

    #[instrument(skip(self), level = "debug")]
    fn remove(&self, key: &str) -> DomainResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(InfrastructureError::FileSystem(format!(
                "Cannot remove {}: {}",
                path.display(),
                e
            ))
            .into()),
        }
    }
}

/// Volatile store for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> DomainResult<Option<String>> {
        Ok(self.values.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> DomainResult<()> {
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> DomainResult<()> {
        self.values.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::key_value_store::TAGS_KEY;
    use tempfile::tempdir;

    #[test]
    fn given_missing_dir_when_set_then_created_and_readable() {
        let temp = tempdir().unwrap();
        let store = FileKeyValueStore::new(temp.path().join("nested/data"));

        assert_eq!(store.get(TAGS_KEY).unwrap(), None);
        store.set(TAGS_KEY, "{\"availableTags\":[]}").unwrap();
        assert_eq!(
            store.get(TAGS_KEY).unwrap().as_deref(),
            Some("{\"availableTags\":[]}")
        );
        assert!(temp.path().join("nested/data/greek_football_tags.json").exists());
    }

    #[test]
    fn given_absent_key_when_remove_then_ok() {
        let temp = tempdir().unwrap();
        let store = FileKeyValueStore::new(temp.path());
        store.remove("quiz-stats").unwrap();

        store.set("quiz-stats", "{}").unwrap();
        store.remove("quiz-stats").unwrap();
        assert_eq!(store.get("quiz-stats").unwrap(), None);
    }

    #[test]
    fn given_path_like_key_when_set_then_rejected() {
        let temp = tempdir().unwrap();
        let store = FileKeyValueStore::new(temp.path());
        assert!(store.set("../escape", "x").is_err());
        assert!(store.get("").is_err());
    }

    #[test]
    fn given_memory_store_when_overwritten_then_last_value_wins() {
        let store = InMemoryKeyValueStore::new();
        store.set("k", "1").unwrap();
        store.set("k", "2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("2"));
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}
