//! Browser Storage
//!
//! [`SessionStore`] over `window.localStorage`.

use bi_tool::session::{SessionStore, StoreError};

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .ok_or_else(|| StoreError::Unavailable("no window".to_string()))?
            .local_storage()
            .map_err(|e| StoreError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| StoreError::Unavailable("localStorage disabled".to_string()))
    }
}

impl SessionStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| StoreError::Io(format!("{:?}", e)))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        // Throws when the quota is exceeded or storage is blocked
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| StoreError::Io(format!("{:?}", e)))
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|e| StoreError::Io(format!("{:?}", e)))
    }
}
