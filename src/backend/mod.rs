//! # Backend Service
//!
//! The remote persistence + auth seam. The core is agnostic to the transport
//! (REST, RPC, or an SDK) as long as insert/select/delete on the named
//! collections (`orders`, `order_items`, `admin_records`) and a
//! success/failure signal are available.
//!
//! Checkout treats every error from this seam uniformly as "remote
//! unavailable"; the [`BackendError`] split exists for logging only.

pub mod mock;

pub use mock::MockBackend;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{AdminRecordUpload, AuthUser, NewOrder, NewOrderItem, RemoteOrder};

/// Errors from the remote Backend Service.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BackendError {
    /// Transport-level failure reaching the service.
    #[error("backend unreachable: {0}")]
    Unreachable(String),
    /// The service was reached but rejected the operation (validation,
    /// permissions, row-level security).
    #[error("backend rejected the request: {0}")]
    Rejected(String),
}

/// Remote relational store with authentication.
#[async_trait]
pub trait BackendService: Send + Sync + 'static {
    /// The authenticated session user, if any.
    async fn current_auth_user(&self) -> Result<Option<AuthUser>, BackendError>;

    /// Insert an order header; returns the created row (with its id).
    async fn insert_order(&self, order: NewOrder) -> Result<RemoteOrder, BackendError>;

    /// Orders previously created by `auth_user_id`, newest first.
    async fn list_orders(&self, auth_user_id: &str) -> Result<Vec<RemoteOrder>, BackendError>;

    /// Batch-insert order lines for an existing order header.
    async fn insert_order_items(&self, items: Vec<NewOrderItem>) -> Result<(), BackendError>;

    /// Batch-insert administrative records.
    async fn insert_admin_records(
        &self,
        records: Vec<AdminRecordUpload>,
    ) -> Result<(), BackendError>;

    /// Administrative records ordered by `created_at` descending, at most
    /// `limit` rows.
    async fn list_admin_records(
        &self,
        limit: usize,
    ) -> Result<Vec<AdminRecordUpload>, BackendError>;

    /// Delete one administrative record by id.
    async fn delete_admin_record(&self, id: &str) -> Result<(), BackendError>;
}

/// Backend stand-in that reports every operation as unreachable.
///
/// Useful for the demo binary and for driving flows down the local fallback
/// path without network setup. There is no session, so
/// [`current_auth_user`](BackendService::current_auth_user) returns `None`
/// rather than an error.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineBackend;

impl OfflineBackend {
    fn offline<T>() -> Result<T, BackendError> {
        Err(BackendError::Unreachable("offline".to_string()))
    }
}

#[async_trait]
impl BackendService for OfflineBackend {
    async fn current_auth_user(&self) -> Result<Option<AuthUser>, BackendError> {
        Ok(None)
    }

    async fn insert_order(&self, _order: NewOrder) -> Result<RemoteOrder, BackendError> {
        Self::offline()
    }

    async fn list_orders(&self, _auth_user_id: &str) -> Result<Vec<RemoteOrder>, BackendError> {
        Self::offline()
    }

    async fn insert_order_items(&self, _items: Vec<NewOrderItem>) -> Result<(), BackendError> {
        Self::offline()
    }

    async fn insert_admin_records(
        &self,
        _records: Vec<AdminRecordUpload>,
    ) -> Result<(), BackendError> {
        Self::offline()
    }

    async fn list_admin_records(
        &self,
        _limit: usize,
    ) -> Result<Vec<AdminRecordUpload>, BackendError> {
        Self::offline()
    }

    async fn delete_admin_record(&self, _id: &str) -> Result<(), BackendError> {
        Self::offline()
    }
}
