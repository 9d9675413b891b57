//! # Admin Ledger
//!
//! Local home of the administrative audit trail, plus its reconciliation
//! with the backend's `admin_records` collection.
//!
//! The ledger is append-mostly: checkout appends a batch per order, the
//! kitchen dashboard reads and tallies it, a staff member may delete a
//! handled record. Remote sync merges by record id, with the remote row
//! winning, so a record mirrored at checkout and later fetched back lands on
//! the same entry instead of duplicating it.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::backend::{BackendError, BackendService};
use crate::model::AdminRecord;
use crate::store::{json, keys, LocalStore, StoreError};

/// Default row cap for a remote sync fetch.
pub const SYNC_LIMIT: usize = 500;

/// Errors from ledger operations that must not fail soft.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AdminError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Append `records` to the locally persisted ledger.
///
/// Reads fail soft (a corrupt ledger restarts empty), the write surfaces its
/// error to the caller.
pub async fn append<S>(store: &S, records: &[AdminRecord]) -> Result<(), StoreError>
where
    S: LocalStore + ?Sized,
{
    let mut ledger: Vec<AdminRecord> = json::read_list_soft(store, keys::ADMIN_RECORDS).await;
    ledger.extend_from_slice(records);
    json::write(store, keys::ADMIN_RECORDS, &ledger).await?;
    debug!(appended = records.len(), total = ledger.len(), "Admin records appended");
    Ok(())
}

/// Per-product aggregation over the ledger, for the kitchen dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductTally {
    pub title: String,
    /// Total units ordered across all records for this product.
    pub units: u32,
    /// One entry per unit, in ledger order.
    pub names: Vec<String>,
}

/// The ledger with its remote counterpart.
pub struct AdminLedger<S: LocalStore, B: BackendService> {
    store: Arc<S>,
    backend: Arc<B>,
}

impl<S: LocalStore, B: BackendService> AdminLedger<S, B> {
    pub fn new(store: Arc<S>, backend: Arc<B>) -> Self {
        Self { store, backend }
    }

    /// The locally persisted records, newest first. Fails soft to empty.
    pub async fn records(&self) -> Vec<AdminRecord> {
        let mut records: Vec<AdminRecord> =
            json::read_list_soft(self.store.as_ref(), keys::ADMIN_RECORDS).await;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }

    /// Merge the remote collection into the local ledger.
    ///
    /// Keyed by record id, remote wins: a record both appended at checkout
    /// and fetched back takes the remote row's fields. Local-only records
    /// (offline checkouts whose mirror never landed) are kept. The merged
    /// ledger is persisted and returned newest first.
    #[instrument(skip(self))]
    pub async fn sync_from_remote(&self) -> Result<Vec<AdminRecord>, AdminError> {
        let remote = self.backend.list_admin_records(SYNC_LIMIT).await?;

        let local: Vec<AdminRecord> =
            json::read_list_soft(self.store.as_ref(), keys::ADMIN_RECORDS).await;
        let mut merged: BTreeMap<String, AdminRecord> = local
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        let fetched = remote.len();
        for upload in remote {
            let record = AdminRecord::from_upload(upload);
            merged.insert(record.id.clone(), record);
        }

        let mut records: Vec<AdminRecord> = merged.into_values().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        json::write(self.store.as_ref(), keys::ADMIN_RECORDS, &records).await?;
        info!(fetched, total = records.len(), "Admin ledger synced");
        Ok(records)
    }

    /// Delete one record.
    ///
    /// The local removal is the operation; the remote delete is best-effort
    /// and only logged on failure.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), AdminError> {
        let mut records: Vec<AdminRecord> =
            json::read_list_soft(self.store.as_ref(), keys::ADMIN_RECORDS).await;
        records.retain(|r| r.id != id);
        json::write(self.store.as_ref(), keys::ADMIN_RECORDS, &records).await?;

        if let Err(e) = self.backend.delete_admin_record(id).await {
            warn!(%id, error = %e, "Remote admin record delete failed");
        }
        info!(%id, "Admin record deleted");
        Ok(())
    }

    /// Drop the whole local ledger. The remote collection is untouched.
    pub async fn clear(&self) -> Result<(), AdminError> {
        self.store.remove(keys::ADMIN_RECORDS).await?;
        info!("Admin ledger cleared");
        Ok(())
    }

    /// Aggregate the ledger per product title.
    ///
    /// Units sum the record quantities; names concatenate in ledger order,
    /// falling back to splitting `note` when a record carries no name list.
    pub async fn tally(&self) -> Vec<ProductTally> {
        let records = self.records().await;
        let mut tallies: BTreeMap<String, ProductTally> = BTreeMap::new();
        for record in records {
            let entry = tallies
                .entry(record.title.clone())
                .or_insert_with(|| ProductTally {
                    title: record.title.clone(),
                    units: 0,
                    names: Vec::new(),
                });
            entry.units += record.quantity;
            if record.names.is_empty() {
                entry.names.extend(
                    record
                        .note
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty()),
                );
            } else {
                entry.names.extend(record.names);
            }
        }
        tallies.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::backend::MockBackend;
    use crate::store::MemoryStore;

    fn record(id: &str, title: &str, quantity: u32, minute: u32) -> AdminRecord {
        let names = vec!["Giovanna".to_string(); quantity as usize];
        AdminRecord {
            id: id.to_string(),
            order_id: Some("ord_1".into()),
            admin_user_id: None,
            user_id: Some("u_1".into()),
            product_id: Some("5".into()),
            title: title.to_string(),
            quantity,
            note: names.join(", "),
            names,
            action: "order".into(),
            status: "created".into(),
            created_at: Utc.with_ymd_and_hms(2025, 10, 6, 12, minute, 0).unwrap(),
        }
    }

    fn ledger(store: &Arc<MemoryStore>, backend: &Arc<MockBackend>) -> AdminLedger<MemoryStore, MockBackend> {
        AdminLedger::new(Arc::clone(store), Arc::clone(backend))
    }

    #[tokio::test]
    async fn append_accumulates_and_records_sort_newest_first() {
        let store = Arc::new(MemoryStore::default());
        let backend = Arc::new(MockBackend::new());
        append(store.as_ref(), &[record("adm_1", "Bolo", 1, 0)])
            .await
            .unwrap();
        append(store.as_ref(), &[record("adm_2", "Assados", 2, 5)])
            .await
            .unwrap();

        let records = ledger(&store, &backend).records().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "adm_2");
        assert_eq!(records[1].id, "adm_1");
    }

    #[tokio::test]
    async fn sync_merges_by_id_with_remote_winning() {
        let store = Arc::new(MemoryStore::default());
        let backend = Arc::new(MockBackend::new());

        let local_only = record("adm_local", "Bolo", 1, 0);
        let mut shared = record("adm_shared", "Assados", 2, 1);
        append(store.as_ref(), &[local_only.clone(), shared.clone()])
            .await
            .unwrap();

        shared.status = "done".into();
        backend
            .expect_list_admin_records()
            .return_ok(vec![shared.upload()]);

        let merged = ledger(&store, &backend).sync_from_remote().await.unwrap();
        backend.verify();

        assert_eq!(merged.len(), 2);
        let synced = merged.iter().find(|r| r.id == "adm_shared").unwrap();
        assert_eq!(synced.status, "done");
        assert_eq!(synced.names.len(), 2);
        assert!(merged.iter().any(|r| r.id == "adm_local"));

        // the merge was persisted
        let reread = ledger(&store, &backend).records().await;
        assert_eq!(reread, merged);
    }

    #[tokio::test]
    async fn delete_removes_locally_even_when_remote_fails() {
        let store = Arc::new(MemoryStore::default());
        let backend = Arc::new(MockBackend::new());
        append(
            store.as_ref(),
            &[record("adm_1", "Bolo", 1, 0), record("adm_2", "Assados", 1, 1)],
        )
        .await
        .unwrap();

        backend
            .expect_delete_admin_record()
            .return_err(BackendError::Unreachable("down".into()));

        let ledger = ledger(&store, &backend);
        ledger.delete("adm_1").await.unwrap();
        backend.verify();

        let records = ledger.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "adm_2");
    }

    #[tokio::test]
    async fn tally_sums_units_and_collects_names_per_product() {
        let store = Arc::new(MemoryStore::default());
        let backend = Arc::new(MockBackend::new());

        let mut bare = record("adm_3", "Bolo", 2, 2);
        bare.names.clear(); // names recovered from the note
        append(
            store.as_ref(),
            &[
                record("adm_1", "Bolo", 1, 0),
                record("adm_2", "Assados", 3, 1),
                bare,
            ],
        )
        .await
        .unwrap();

        let tallies = ledger(&store, &backend).tally().await;
        assert_eq!(tallies.len(), 2);

        let bolo = tallies.iter().find(|t| t.title == "Bolo").unwrap();
        assert_eq!(bolo.units, 3);
        assert_eq!(bolo.names.len(), 3);

        let assados = tallies.iter().find(|t| t.title == "Assados").unwrap();
        assert_eq!(assados.units, 3);
    }

    #[tokio::test]
    async fn clear_drops_the_ledger() {
        let store = Arc::new(MemoryStore::default());
        let backend = Arc::new(MockBackend::new());
        append(store.as_ref(), &[record("adm_1", "Bolo", 1, 0)])
            .await
            .unwrap();

        let ledger = ledger(&store, &backend);
        ledger.clear().await.unwrap();
        assert!(ledger.records().await.is_empty());
    }
}
