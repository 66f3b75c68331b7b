use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use super::{KeyValueStore, StoreError, StoreResult};

/// In-process store. Lost when dropped.
///
/// `fail_writes` makes every subsequent `set` return `QuotaExceeded` and
/// `fail_reads` makes every `get` return an I/O error, which lets tests
/// exercise the failure paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        store
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::other(format!(
                "read of {key} failed"
            ))));
        }
        let entries = self
            .entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::QuotaExceeded {
                key: key.to_string(),
            });
        }
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let store = MemoryStore::new();
        assert_eq!(store.get("gwaRecords").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_replaces_previous_value() {
        let store = MemoryStore::with_entry("gwaTheme", "light");
        store.set("gwaTheme", "dark").await.unwrap();
        assert_eq!(store.get("gwaTheme").await.unwrap().as_deref(), Some("dark"));

        store.remove("gwaTheme").await.unwrap();
        assert_eq!(store.get("gwaTheme").await.unwrap(), None);
    }

    #[tokio::test]
    async fn injected_fault_rejects_writes() {
        let store = MemoryStore::new();
        store.fail_writes(true);
        let err = store.set("gwaRecords", "[]").await.unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { .. }));
        assert_eq!(store.get("gwaRecords").await.unwrap(), None);
    }

    #[tokio::test]
    async fn injected_fault_rejects_reads() {
        let store = MemoryStore::with_entry("gwaTheme", "dark");
        store.fail_reads(true);
        assert!(matches!(store.get("gwaTheme").await, Err(StoreError::Io(_))));

        store.fail_reads(false);
        assert_eq!(store.get("gwaTheme").await.unwrap().as_deref(), Some("dark"));
    }
}
