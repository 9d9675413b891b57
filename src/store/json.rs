//! JSON snapshot helpers over [`LocalStore`].
//!
//! Reads fail soft: a missing key, a storage fault, or a malformed payload
//! all collapse to the empty value, so corrupt snapshots can never take a
//! screen down. Writes surface their [`StoreError`] to the caller.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use super::{LocalStore, StoreError};

/// Read a JSON list under `key`, treating absence, read faults, and
/// malformed payloads as an empty list.
pub async fn read_list_soft<T, S>(store: &S, key: &str) -> Vec<T>
where
    T: DeserializeOwned,
    S: LocalStore + ?Sized,
{
    match store.get(key).await {
        Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
            Ok(list) => list,
            Err(e) => {
                warn!(key, error = %e, "Malformed snapshot, treating as empty");
                Vec::new()
            }
        },
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!(key, error = %e, "Storage read failed, treating as empty");
            Vec::new()
        }
    }
}

/// Read a single JSON value under `key`, treating absence, read faults, and
/// malformed payloads as `None`.
pub async fn read_soft<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: LocalStore + ?Sized,
{
    match store.get(key).await {
        Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Malformed record, treating as absent");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!(key, error = %e, "Storage read failed, treating as absent");
            None
        }
    }
}

/// Serialize `value` and write it under `key`.
pub async fn write<T, S>(store: &S, key: &str, value: &T) -> Result<(), StoreError>
where
    T: Serialize,
    S: LocalStore + ?Sized,
{
    let bytes = serde_json::to_vec(value).map_err(|e| StoreError::Write {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    store.set(key, bytes).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::keys;
    use crate::store::memory::MemoryStore;

    #[tokio::test]
    async fn malformed_payload_reads_as_empty() {
        let store = MemoryStore::default();
        store
            .set(keys::CART, b"not json at all".to_vec())
            .await
            .unwrap();
        let list: Vec<u32> = read_list_soft(&store, keys::CART).await;
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let store = MemoryStore::default();
        write(&store, "numbers", &vec![1u32, 2, 3]).await.unwrap();
        let list: Vec<u32> = read_list_soft(&store, "numbers").await;
        assert_eq!(list, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let store = MemoryStore::default();
        let value: Option<String> = read_soft(&store, "absent").await;
        assert!(value.is_none());
    }
}
