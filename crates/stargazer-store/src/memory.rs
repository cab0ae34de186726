//! In-memory [`SnapshotStore`], used by tests and headless runs.

use std::collections::BTreeMap;

use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::slot::{SnapshotStore, validate_key};

/// A [`SnapshotStore`] backed by a map. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of occupied slots.
    pub async fn len(&self) -> usize {
        self.slots.read().await.len()
    }

    /// Whether no slot is occupied.
    pub async fn is_empty(&self) -> bool {
        self.slots.read().await.is_empty()
    }
}

impl SnapshotStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        validate_key(key)?;
        Ok(self.slots.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        self.slots
            .write()
            .await
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        self.slots.write().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get_returns_value() {
        let store = MemoryStore::new();
        store.set("gameState", "{}").await.unwrap();
        assert_eq!(store.get("gameState").await.unwrap().as_deref(), Some("{}"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn missing_slot_is_none() {
        let store = MemoryStore::new();
        assert!(store.get("gameState").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let store = MemoryStore::new();
        store.set("gameState", "x").await.unwrap();
        store.delete("gameState").await.unwrap();
        store.delete("gameState").await.unwrap();
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn invalid_key_is_rejected() {
        let store = MemoryStore::new();
        let err = store.set("a/b", "x").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey(_)));
    }
}
