//! # Store Doubles
//!
//! Utilities for testing flows against a misbehaving or observed store.
//!
//! - [`RecordingStore`] wraps any store and logs every operation, so a test
//!   can assert that a flow performed no writes.
//! - [`FailingStore`] serves reads from a seeded [`MemoryStore`] but can be
//!   configured to fail reads and/or writes, for fault-path tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::memory::MemoryStore;
use super::{LocalStore, StoreError};

/// One observed store operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Get(String),
    Set(String),
    Remove(String),
}

/// Wrapper that records every operation passed to the inner store.
#[derive(Debug, Default)]
pub struct RecordingStore<S> {
    inner: S,
    ops: Mutex<Vec<Op>>,
}

impl<S: LocalStore> RecordingStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            ops: Mutex::new(Vec::new()),
        }
    }

    /// All operations observed so far, in order.
    pub fn ops(&self) -> Vec<Op> {
        self.ops.lock().unwrap().clone()
    }

    /// Number of mutating operations (`Set` + `Remove`) observed so far.
    pub fn writes(&self) -> usize {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| !matches!(op, Op::Get(_)))
            .count()
    }

    fn record(&self, op: Op) {
        self.ops.lock().unwrap().push(op);
    }
}

#[async_trait]
impl<S: LocalStore> LocalStore for RecordingStore<S> {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.record(Op::Get(key.to_string()));
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.record(Op::Set(key.to_string()));
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.record(Op::Remove(key.to_string()));
        self.inner.remove(key).await
    }
}

/// Store whose reads and/or writes fail on demand.
///
/// Reads that are allowed come from the seeded inner [`MemoryStore`], so a
/// test can start from a realistic persisted state and then cut the device
/// storage out from under the flow.
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MemoryStore,
    fail_reads: bool,
    fail_writes: bool,
}

impl FailingStore {
    /// A store on which every write (and remove) fails.
    pub fn failing_writes() -> Self {
        Self {
            inner: MemoryStore::default(),
            fail_reads: false,
            fail_writes: true,
        }
    }

    /// A store on which every read fails.
    pub fn failing_reads() -> Self {
        Self {
            inner: MemoryStore::default(),
            fail_reads: true,
            fail_writes: false,
        }
    }

    /// Seed the inner store directly, bypassing the failure switches.
    pub async fn seed(&self, key: &str, value: Vec<u8>) {
        self.inner
            .set(key, value)
            .await
            .unwrap_or_else(|e| panic!("seeding {key} failed: {e}"));
    }
}

#[async_trait]
impl LocalStore for FailingStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Read {
                key: key.to_string(),
                reason: "injected read failure".to_string(),
            });
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Write {
                key: key.to_string(),
                reason: "injected write failure".to_string(),
            });
        }
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Write {
                key: key.to_string(),
                reason: "injected write failure".to_string(),
            });
        }
        self.inner.remove(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn recording_store_counts_writes() {
        let store = RecordingStore::new(MemoryStore::default());
        let _ = store.get("cart").await;
        store.set("cart", vec![1]).await.unwrap();
        store.remove("cart").await.unwrap();

        assert_eq!(store.writes(), 2);
        assert_eq!(
            store.ops(),
            vec![
                Op::Get("cart".into()),
                Op::Set("cart".into()),
                Op::Remove("cart".into())
            ]
        );
    }

    #[tokio::test]
    async fn failing_writes_still_serves_seeded_reads() {
        let store = FailingStore::failing_writes();
        store.seed("cart", b"[]".to_vec()).await;

        assert_eq!(store.get("cart").await.unwrap(), Some(b"[]".to_vec()));
        assert!(store.set("cart", vec![1]).await.is_err());
        assert!(store.remove("cart").await.is_err());
    }
}
