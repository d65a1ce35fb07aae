//! Key-Value Storage
//!
//! The only persistence layer. The browser build plugs in localStorage;
//! tests use [`MemoryStore`].

use std::cell::RefCell;
use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ComposeError, ComposeResult};

// ========================
// Storage Keys
// ========================

pub const KEY_THEME: &str = "composer.theme.v1";
pub const KEY_COMPOSE_MODE: &str = "composer.composeMode.v1";
pub const KEY_DEFAULTS: &str = "composer.defaults.v1";
pub const KEY_USER_TEMPLATES: &str = "composer.userTemplates.v1";
pub const KEY_VISIBLE_INTENTS: &str = "composer.visibleIntents.v1";

/// String key-value store with localStorage semantics
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> ComposeResult<()>;

    fn remove(&self, key: &str);
}

impl<T: KvStore + ?Sized> KvStore for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> ComposeResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> ComposeResult<()> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Read a JSON value; absent or unparseable data yields `None`
pub fn read_json<T: DeserializeOwned>(store: &impl KvStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("ignoring unreadable {}: {}", key, e);
            None
        }
    }
}

pub fn write_json<T: Serialize + ?Sized>(store: &impl KvStore, key: &str, value: &T) -> ComposeResult<()> {
    let raw = serde_json::to_string(value).map_err(|e| ComposeError::Storage {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    store.set(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_json_defensive() {
        let store = MemoryStore::new();
        assert_eq!(read_json::<Vec<String>>(&store, "k"), None);

        store.set("k", "{not json").unwrap();
        assert_eq!(read_json::<Vec<String>>(&store, "k"), None);

        write_json(&store, "k", &vec!["a".to_string()]).unwrap();
        assert_eq!(read_json::<Vec<String>>(&store, "k"), Some(vec!["a".to_string()]));
    }

    #[test]
    fn test_remove() {
        let store = MemoryStore::new();
        store.set("k", "1").unwrap();
        store.remove("k");
        assert_eq!(store.get("k"), None);
    }
}
