//! Session Storage
//!
//! Synchronous string key/value storage, last writer wins. Mirrors the
//! `localStorage` surface so the browser, a file and a map are interchangeable.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

/// Serialized [`SessionUser`](super::SessionUser); absent when logged out
pub const CURRENT_USER_KEY: &str = "currentUser";

/// `"true"` or `"false"`
pub const KEEP_LOGGED_IN_KEY: &str = "keepLoggedIn";

/// Storage errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable client storage
pub trait SessionStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: SessionStore + ?Sized> SessionStore for Rc<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove_item(key)
    }
}

/// In-memory store. Clones share the same map, which lets a test hand the
/// same storage to a second manager to simulate a page reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Rc<RefCell<HashMap<String, String>>>,
    read_only: Rc<Cell<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail with [`StoreError::Unavailable`]
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.read_only.get() {
            return Err(StoreError::Unavailable("storage is read-only".into()));
        }
        Ok(())
    }
}

impl SessionStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.check_writable()?;
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_items() {
        let store = MemoryStore::new();
        let reloaded = store.clone();
        store.set_item(KEEP_LOGGED_IN_KEY, "true").unwrap();
        assert_eq!(
            reloaded.get_item(KEEP_LOGGED_IN_KEY).unwrap().as_deref(),
            Some("true")
        );
        reloaded.remove_item(KEEP_LOGGED_IN_KEY).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let store = MemoryStore::new();
        store.set_read_only(true);
        assert!(matches!(
            store.set_item(CURRENT_USER_KEY, "{}"),
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.get_item(CURRENT_USER_KEY).unwrap().is_none());
    }
}
