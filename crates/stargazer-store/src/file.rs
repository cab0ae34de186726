//! File-backed [`SnapshotStore`].
//!
//! Each slot is a single `<key>.json` file inside the store directory.
//! Writes go to a temp file unique to that write and are renamed into place,
//! so a crash mid-write leaves the previous value intact and concurrent
//! writers to one slot never share a temp file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::StoreError;
use crate::slot::{SnapshotStore, validate_key};

/// Extension appended to every slot file.
const SLOT_EXTENSION: &str = "json";

/// Sequence for temp file names within this process.
static WRITE_SEQ: AtomicU64 = AtomicU64::new(0);

/// `<key>.json.<pid>.<seq>.tmp` next to the slot file.
fn temp_path(path: &Path) -> PathBuf {
    let seq = WRITE_SEQ.fetch_add(1, Ordering::Relaxed);
    path.with_extension(format!(
        "{SLOT_EXTENSION}.{}.{seq}.tmp",
        std::process::id()
    ))
}

/// A [`SnapshotStore`] that keeps one file per slot in a directory.
///
/// The directory is created on the first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory holding slot files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    pub fn slot_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.{SLOT_EXTENSION}")))
    }
}

fn io_error(key: &str) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        key: key.to_owned(),
        source,
    }
}

impl SnapshotStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.slot_path(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key)(e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.slot_path(key)?;
        let tmp = temp_path(&path);

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(io_error(key))?;
        tokio::fs::write(&tmp, value.as_bytes())
            .await
            .map_err(io_error(key))?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(io_error(key)(e));
        }

        tracing::trace!(key, path = %path.display(), bytes = value.len(), "slot written");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let path = self.slot_path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key)(e)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// A fresh directory under the system temp dir, unique per test.
    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "stargazer-store-{}-{name}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    /// Names of leftover temp files in `dir`.
    fn temp_files(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp"))
            .collect()
    }

    #[tokio::test]
    async fn round_trips_through_disk() {
        let dir = scratch_dir("round-trip");
        let store = FileStore::new(&dir);

        store.set("gameState", r#"{"a":1}"#).await.unwrap();
        assert!(dir.join("gameState.json").exists());
        assert!(temp_files(&dir).is_empty());

        let reopened = FileStore::new(&dir);
        assert_eq!(
            reopened.get("gameState").await.unwrap().as_deref(),
            Some(r#"{"a":1}"#)
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn missing_directory_reads_as_empty() {
        let dir = scratch_dir("missing");
        let store = FileStore::new(&dir);
        assert!(store.get("gameState").await.unwrap().is_none());
        store.delete("gameState").await.unwrap();
    }

    #[tokio::test]
    async fn overwrite_replaces_previous_value() {
        let dir = scratch_dir("overwrite");
        let store = FileStore::new(&dir);

        store.set("gameState", "first").await.unwrap();
        store.set("gameState", "second").await.unwrap();
        assert_eq!(store.get("gameState").await.unwrap().as_deref(), Some("second"));

        store.delete("gameState").await.unwrap();
        assert!(store.get("gameState").await.unwrap().is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writes_to_one_slot_all_land() {
        let dir = scratch_dir("concurrent");
        let store = FileStore::new(&dir);
        let values: Vec<String> = (0..16).map(|i| format!(r#"{{"writer":{i}}}"#)).collect();

        let mut writers = tokio::task::JoinSet::new();
        for value in values.clone() {
            let store = store.clone();
            writers.spawn(async move { store.set("gameState", &value).await });
        }
        while let Some(written) = writers.join_next().await {
            written.unwrap().unwrap();
        }

        let stored = store.get("gameState").await.unwrap().unwrap();
        assert!(values.contains(&stored));
        assert!(temp_files(&dir).is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn slot_path_rejects_traversal() {
        let store = FileStore::new("/tmp/stargazer");
        assert!(store.slot_path("../escape").is_err());
        assert_eq!(
            store.slot_path("gameState").unwrap(),
            PathBuf::from("/tmp/stargazer/gameState.json")
        );
    }
}
