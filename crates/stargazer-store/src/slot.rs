//! The [`SnapshotStore`] trait: a durable key-value slot for serialized
//! snapshots.
//!
//! Values are opaque strings. Serialization and validation belong to the
//! caller; the store only guarantees that a completed `set` is visible to a
//! later `get` and that `delete` of a missing key is not an error.

use std::future::Future;
use std::sync::Arc;

use crate::error::StoreError;

/// Durable storage for named slots.
pub trait SnapshotStore: Send + Sync {
    /// Read the value stored at `key`, or `None` if the slot is empty.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Replace the value stored at `key`.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Remove `key`. Removing an empty slot succeeds.
    fn delete(&self, key: &str) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Lets a caller keep a handle to a store after handing a clone to an
/// engine.
impl<S: SnapshotStore> SnapshotStore for Arc<S> {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send {
        S::get(self, key)
    }

    fn set(&self, key: &str, value: &str) -> impl Future<Output = Result<(), StoreError>> + Send {
        S::set(self, key, value)
    }

    fn delete(&self, key: &str) -> impl Future<Output = Result<(), StoreError>> + Send {
        S::delete(self, key)
    }
}

/// Reject keys that cannot double as a file stem.
///
/// Allowed: ASCII letters, digits, `-` and `_`.
pub fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_owned()))
    }
}
