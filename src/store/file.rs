//! File-backed [`LocalStore`]: one file per key under a root directory.
//!
//! Writes go to `<key>.tmp` in the same directory (same filesystem as the
//! final path) and are renamed over `<key>.json`, so a crash mid-write
//! leaves the previous snapshot intact. On any write failure the temp file
//! is removed and the original is left untouched.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{LocalStore, StoreError};

/// Durable store persisting each key as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| StoreError::Write {
                key: root.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    async fn remove_quietly(path: &Path) {
        let _ = tokio::fs::remove_file(path).await;
    }
}

#[async_trait]
impl LocalStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match tokio::fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Read {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let tmp = self.root.join(format!("{key}.tmp"));

        if let Err(e) = tokio::fs::write(&tmp, &value).await {
            Self::remove_quietly(&tmp).await;
            return Err(StoreError::Write {
                key: key.to_string(),
                reason: e.to_string(),
            });
        }
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            Self::remove_quietly(&tmp).await;
            return Err(StoreError::Write {
                key: key.to_string(),
                reason: format!("rename to final path failed: {e}"),
            });
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Write {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}
