//! In-process key-value backend

use super::KeyValueStore;
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// Keys and values held in memory; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn data(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>> {
        self.data
            .lock()
            .map_err(|_| Error::StoreUnavailable("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.data()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn set_many(&self, entries: &[(String, String)]) -> Result<()> {
        let mut data = self.data()?;
        for (key, value) in entries {
            data.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.data()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.data()?.keys().cloned().collect())
    }

    fn clear(&self) -> Result<()> {
        self.data()?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_crud() {
        let store = MemoryStore::new();
        assert_eq!(store.get("media").unwrap(), None);

        store.set("media", "[]").unwrap();
        store
            .set_many(&[
                ("ideas".to_string(), "[1]".to_string()),
                ("captures".to_string(), "[2]".to_string()),
            ])
            .unwrap();
        assert_eq!(store.get("media").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.keys().unwrap(), vec!["captures", "ideas", "media"]);

        store.remove("ideas").unwrap();
        store.remove("ideas").unwrap();
        assert_eq!(store.get("ideas").unwrap(), None);

        store.clear().unwrap();
        assert!(store.keys().unwrap().is_empty());
    }
}
