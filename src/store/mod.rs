//! # Local Store
//!
//! The device-scoped persistence seam: a durable, asynchronous key-value
//! byte store. The core treats every call as potentially failing and assumes
//! no ordering guarantees across keys: writing the cart key and the
//! admin-records key are two separate, independently failable operations.
//!
//! ## Implementations
//!
//! - [`MemoryStore`]: in-process map, used by tests and the demo.
//! - [`JsonFileStore`]: one file per key with atomic tmp+rename writes.
//! - [`mock`]: recording and failing doubles for fault-path tests.

pub mod file;
pub mod json;
pub mod memory;
pub mod mock;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by [`LocalStore`] operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// The underlying storage failed to read a key.
    #[error("storage read failed for key '{key}': {reason}")]
    Read { key: String, reason: String },
    /// The underlying storage failed to write or remove a key.
    #[error("storage write failed for key '{key}': {reason}")]
    Write { key: String, reason: String },
}

/// Durable, asynchronous key-value byte store scoped to the device.
///
/// Each call is an independent atomic operation on a single key; there are
/// no cross-key transactions.
#[async_trait]
pub trait LocalStore: Send + Sync + 'static {
    /// Read the bytes under `key`, or `None` if the key is absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replace the bytes under `key`.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Drop `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Conceptual keys used by the core.
///
/// The cart key is written only by the cart actor; no other component
/// touches it.
pub mod keys {
    /// Whole-snapshot cart, persisted on every mutation.
    pub const CART: &str = "cart";
    /// Orders that could not be sent to the backend (embedded lines).
    pub const PENDING_ORDERS: &str = "pending-orders";
    /// Administrative audit records.
    pub const ADMIN_RECORDS: &str = "admin-records";
    /// Auth-service user cached by the login flow.
    pub const AUTH_USER: &str = "auth-user";
    /// Registered profile cached by the registration flow.
    pub const PROFILE: &str = "profile";
    /// Locally registered products merged into the catalog.
    pub const PRODUCTS: &str = "products";
}
