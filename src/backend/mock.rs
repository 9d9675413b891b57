//! # Mock Backend
//!
//! Utilities for testing checkout and sync flows in isolation.
//!
//! `MockBackend` is scripted with an ordered queue of expectations, in the
//! same fluent style as the store doubles:
//!
//! ```ignore
//! let backend = Arc::new(MockBackend::new());
//! backend.expect_auth_user().return_ok(None);
//! backend.expect_insert_order().return_err(BackendError::Unreachable("down".into()));
//!
//! // run the flow under test ...
//!
//! backend.verify(); // all expectations consumed
//! let calls = backend.calls(); // payloads, for assertions
//! ```
//!
//! Every call is also recorded with its payload, so tests can assert on the
//! exact order header or item batch the flow sent.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{BackendError, BackendService};
use crate::model::{AdminRecordUpload, AuthUser, NewOrder, NewOrderItem, RemoteOrder};

/// An expected request with its programmed response.
enum Expectation {
    AuthUser(Result<Option<AuthUser>, BackendError>),
    InsertOrder(Result<RemoteOrder, BackendError>),
    ListOrders(Result<Vec<RemoteOrder>, BackendError>),
    InsertOrderItems(Result<(), BackendError>),
    InsertAdminRecords(Result<(), BackendError>),
    ListAdminRecords(Result<Vec<AdminRecordUpload>, BackendError>),
    DeleteAdminRecord(Result<(), BackendError>),
}

impl Expectation {
    fn kind(&self) -> &'static str {
        match self {
            Expectation::AuthUser(_) => "current_auth_user",
            Expectation::InsertOrder(_) => "insert_order",
            Expectation::ListOrders(_) => "list_orders",
            Expectation::InsertOrderItems(_) => "insert_order_items",
            Expectation::InsertAdminRecords(_) => "insert_admin_records",
            Expectation::ListAdminRecords(_) => "list_admin_records",
            Expectation::DeleteAdminRecord(_) => "delete_admin_record",
        }
    }
}

/// A recorded call with the payload the flow under test sent.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    AuthUser,
    InsertOrder(NewOrder),
    ListOrders(String),
    InsertOrderItems(Vec<NewOrderItem>),
    InsertAdminRecords(Vec<AdminRecordUpload>),
    ListAdminRecords(usize),
    DeleteAdminRecord(String),
}

/// Scriptable [`BackendService`] double with expectation tracking.
#[derive(Default)]
pub struct MockBackend {
    expectations: Mutex<VecDeque<Expectation>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expect a `current_auth_user` call.
    pub fn expect_auth_user(&self) -> ResponseBuilder<'_, Option<AuthUser>> {
        ResponseBuilder::new(self, Expectation::AuthUser)
    }

    /// Expect an `insert_order` call.
    pub fn expect_insert_order(&self) -> ResponseBuilder<'_, RemoteOrder> {
        ResponseBuilder::new(self, Expectation::InsertOrder)
    }

    /// Expect a `list_orders` call.
    pub fn expect_list_orders(&self) -> ResponseBuilder<'_, Vec<RemoteOrder>> {
        ResponseBuilder::new(self, Expectation::ListOrders)
    }

    /// Expect an `insert_order_items` call.
    pub fn expect_insert_order_items(&self) -> ResponseBuilder<'_, ()> {
        ResponseBuilder::new(self, Expectation::InsertOrderItems)
    }

    /// Expect an `insert_admin_records` call.
    pub fn expect_insert_admin_records(&self) -> ResponseBuilder<'_, ()> {
        ResponseBuilder::new(self, Expectation::InsertAdminRecords)
    }

    /// Expect a `list_admin_records` call.
    pub fn expect_list_admin_records(&self) -> ResponseBuilder<'_, Vec<AdminRecordUpload>> {
        ResponseBuilder::new(self, Expectation::ListAdminRecords)
    }

    /// Expect a `delete_admin_record` call.
    pub fn expect_delete_admin_record(&self) -> ResponseBuilder<'_, ()> {
        ResponseBuilder::new(self, Expectation::DeleteAdminRecord)
    }

    /// All calls observed so far, in order, with payloads.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Panics if any programmed expectation was not consumed.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }

    fn push(&self, expectation: Expectation) {
        self.expectations.lock().unwrap().push_back(expectation);
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_expectation(&self, wanted: &'static str) -> Expectation {
        let expectation = self.expectations.lock().unwrap().pop_front();
        match expectation {
            Some(e) if e.kind() == wanted => e,
            Some(e) => panic!(
                "Expectation mismatch: next programmed call is '{}' but '{wanted}' arrived",
                e.kind()
            ),
            None => panic!("Unexpected '{wanted}' call: no expectations remaining"),
        }
    }
}

/// Fluent builder binding a programmed response to one expected call.
pub struct ResponseBuilder<'a, T> {
    mock: &'a MockBackend,
    wrap: fn(Result<T, BackendError>) -> Expectation,
}

impl<'a, T> ResponseBuilder<'a, T> {
    fn new(mock: &'a MockBackend, wrap: fn(Result<T, BackendError>) -> Expectation) -> Self {
        Self { mock, wrap }
    }

    /// Program the call to succeed with `value`.
    pub fn return_ok(self, value: T) {
        self.mock.push((self.wrap)(Ok(value)));
    }

    /// Program the call to fail with `error`.
    pub fn return_err(self, error: BackendError) {
        self.mock.push((self.wrap)(Err(error)));
    }
}

#[async_trait]
impl BackendService for MockBackend {
    async fn current_auth_user(&self) -> Result<Option<AuthUser>, BackendError> {
        self.record(RecordedCall::AuthUser);
        match self.next_expectation("current_auth_user") {
            Expectation::AuthUser(response) => response,
            _ => unreachable!(),
        }
    }

    async fn insert_order(&self, order: NewOrder) -> Result<RemoteOrder, BackendError> {
        self.record(RecordedCall::InsertOrder(order));
        match self.next_expectation("insert_order") {
            Expectation::InsertOrder(response) => response,
            _ => unreachable!(),
        }
    }

    async fn list_orders(&self, auth_user_id: &str) -> Result<Vec<RemoteOrder>, BackendError> {
        self.record(RecordedCall::ListOrders(auth_user_id.to_string()));
        match self.next_expectation("list_orders") {
            Expectation::ListOrders(response) => response,
            _ => unreachable!(),
        }
    }

    async fn insert_order_items(&self, items: Vec<NewOrderItem>) -> Result<(), BackendError> {
        self.record(RecordedCall::InsertOrderItems(items));
        match self.next_expectation("insert_order_items") {
            Expectation::InsertOrderItems(response) => response,
            _ => unreachable!(),
        }
    }

    async fn insert_admin_records(
        &self,
        records: Vec<AdminRecordUpload>,
    ) -> Result<(), BackendError> {
        self.record(RecordedCall::InsertAdminRecords(records));
        match self.next_expectation("insert_admin_records") {
            Expectation::InsertAdminRecords(response) => response,
            _ => unreachable!(),
        }
    }

    async fn list_admin_records(
        &self,
        limit: usize,
    ) -> Result<Vec<AdminRecordUpload>, BackendError> {
        self.record(RecordedCall::ListAdminRecords(limit));
        match self.next_expectation("list_admin_records") {
            Expectation::ListAdminRecords(response) => response,
            _ => unreachable!(),
        }
    }

    async fn delete_admin_record(&self, id: &str) -> Result<(), BackendError> {
        self.record(RecordedCall::DeleteAdminRecord(id.to_string()));
        match self.next_expectation("delete_admin_record") {
            Expectation::DeleteAdminRecord(response) => response,
            _ => unreachable!(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn expectations_are_consumed_in_order() {
        let mock = MockBackend::new();
        mock.expect_auth_user().return_ok(Some(AuthUser {
            id: "auth_1".into(),
            email: Some("a@example.com".into()),
        }));
        mock.expect_delete_admin_record()
            .return_err(BackendError::Rejected("rls".into()));

        let user = mock.current_auth_user().await.unwrap().unwrap();
        assert_eq!(user.id, "auth_1");

        let err = mock.delete_admin_record("adm_1").await.unwrap_err();
        assert_eq!(err, BackendError::Rejected("rls".into()));

        mock.verify();
        assert_eq!(
            mock.calls(),
            vec![
                RecordedCall::AuthUser,
                RecordedCall::DeleteAdminRecord("adm_1".into())
            ]
        );
    }

    #[tokio::test]
    #[should_panic(expected = "no expectations remaining")]
    async fn unexpected_call_panics() {
        let mock = MockBackend::new();
        let _ = mock.current_auth_user().await;
    }
}
