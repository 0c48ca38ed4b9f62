//! File-backed session storage for the CLI
//!
//! A flat JSON object of string items. Every call reads the file and every
//! write rewrites it, so separate processes see each other's changes.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::store::{SessionStore, StoreError};

/// [`SessionStore`] persisted to a JSON file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StoreError::Io(e.to_string())),
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Load for a write; an unreadable file is replaced rather than kept.
    fn load_for_write(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match self.load() {
            Ok(items) => Ok(items),
            Err(StoreError::Serialization(e)) => {
                warn!(path = %self.path.display(), error = %e, "Replacing corrupt session file");
                Ok(BTreeMap::new())
            }
            Err(e) => Err(e),
        }
    }

    fn save(&self, items: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
            }
        }
        let content = serde_json::to_string_pretty(items)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        fs::write(&self.path, content).map_err(|e| StoreError::Io(e.to_string()))
    }
}

impl SessionStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut items = self.load_for_write()?;
        items.insert(key.to_string(), value.to_string());
        self.save(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        let mut items = self.load_for_write()?;
        if items.remove(key).is_some() {
            self.save(&items)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::store::{CURRENT_USER_KEY, KEEP_LOGGED_IN_KEY};
    use tempfile::TempDir;

    #[test]
    fn test_items_persist_across_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = FileStore::new(&path);
        assert!(store.get_item(CURRENT_USER_KEY).unwrap().is_none());
        store.set_item(KEEP_LOGGED_IN_KEY, "true").unwrap();

        let again = FileStore::new(&path);
        assert_eq!(
            again.get_item(KEEP_LOGGED_IN_KEY).unwrap().as_deref(),
            Some("true")
        );
        again.remove_item(KEEP_LOGGED_IN_KEY).unwrap();
        assert!(store.get_item(KEEP_LOGGED_IN_KEY).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_file_reads_as_error_and_is_replaced_on_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "[1, 2").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(
            store.get_item(CURRENT_USER_KEY),
            Err(StoreError::Serialization(_))
        ));

        store.set_item(KEEP_LOGGED_IN_KEY, "false").unwrap();
        assert_eq!(
            store.get_item(KEEP_LOGGED_IN_KEY).unwrap().as_deref(),
            Some("false")
        );
    }
}
