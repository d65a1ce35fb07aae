//! Browser Storage
//!
//! localStorage-backed `KvStore` for preferences and user templates.

use composer_core::{ComposeError, ComposeResult, KvStore, Preferences, TemplateStore};

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn local() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl KvStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::local()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> ComposeResult<()> {
        let storage = Self::local().ok_or_else(|| ComposeError::Storage {
            key: key.to_string(),
            reason: "localStorage unavailable".to_string(),
        })?;
        storage.set_item(key, value).map_err(|e| ComposeError::Storage {
            key: key.to_string(),
            reason: format!("{:?}", e),
        })
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::local() {
            let _ = storage.remove_item(key);
        }
    }
}

pub fn preferences() -> Preferences<BrowserStorage> {
    Preferences::new(BrowserStorage)
}

pub fn templates() -> TemplateStore<BrowserStorage> {
    TemplateStore::new(BrowserStorage)
}
