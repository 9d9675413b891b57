//! # Order History
//!
//! Unified view over orders the backend accepted and orders the fallback
//! path kept on the device. Both sources are read fresh on every call and
//! merged by order id with the remote row winning: once a pending order has
//! been replayed to the backend, the remote copy is the authority.

use tracing::warn;

use crate::backend::BackendService;
use crate::model::{LocalOrder, Order, SourcedOrder};
use crate::store::{json, keys, LocalStore};

/// Orders visible to `auth_user_id`, newest first.
///
/// Remote listing fails soft: when the backend is unreachable (or no auth
/// user is known), history still shows the locally pending orders. Local
/// pending orders always appear regardless of who placed them; the device
/// list is not partitioned per user.
pub async fn history<S, B>(store: &S, backend: &B, auth_user_id: Option<&str>) -> Vec<Order>
where
    S: LocalStore + ?Sized,
    B: BackendService + ?Sized,
{
    let remote = match auth_user_id {
        Some(id) => match backend.list_orders(id).await {
            Ok(orders) => orders,
            Err(e) => {
                warn!(error = %e, "Remote order listing failed, showing local only");
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    let pending: Vec<LocalOrder> = json::read_list_soft(store, keys::PENDING_ORDERS).await;

    let mut orders: Vec<Order> = Vec::with_capacity(remote.len() + pending.len());
    orders.extend(pending.into_iter().map(|o| SourcedOrder::Local(o).into_order()));
    for row in remote {
        let order = SourcedOrder::Remote(row).into_order();
        match orders.iter_mut().find(|o| o.id == order.id) {
            Some(existing) => *existing = order,
            None => orders.push(order),
        }
    }

    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    orders
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use crate::backend::{BackendError, MockBackend};
    use crate::model::{OrderStatus, RemoteOrder};
    use crate::store::MemoryStore;

    fn remote(id: &str, minute: u32) -> RemoteOrder {
        RemoteOrder {
            id: id.to_string(),
            user_id: Some("u_1".into()),
            auth_user_id: Some("auth_1".into()),
            total: 6.0,
            status: OrderStatus::Pending,
            created_at: Utc.with_ymd_and_hms(2025, 10, 6, 12, minute, 0).unwrap(),
        }
    }

    fn local(id: &str, minute: u32) -> LocalOrder {
        LocalOrder {
            id: id.to_string(),
            user_id: None,
            auth_user_id: None,
            total: 8.5,
            status: OrderStatus::Pending,
            created_at: Utc.with_ymd_and_hms(2025, 10, 6, 12, minute, 0).unwrap(),
            lines: Vec::new(),
        }
    }

    #[tokio::test]
    async fn merges_both_sources_newest_first() {
        let store = MemoryStore::default();
        json::write(&store, keys::PENDING_ORDERS, &vec![local("1700000000000", 10)])
            .await
            .unwrap();
        let backend = MockBackend::new();
        backend
            .expect_list_orders()
            .return_ok(vec![remote("ord_1", 5), remote("ord_2", 20)]);

        let orders = history(&store, &backend, Some("auth_1")).await;
        backend.verify();

        let ids: Vec<&str> = orders.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["ord_2", "1700000000000", "ord_1"]);
    }

    #[tokio::test]
    async fn remote_row_wins_on_shared_id() {
        let store = MemoryStore::default();
        let mut stale = local("ord_1", 5);
        stale.total = 99.0;
        json::write(&store, keys::PENDING_ORDERS, &vec![stale])
            .await
            .unwrap();
        let backend = MockBackend::new();
        backend.expect_list_orders().return_ok(vec![remote("ord_1", 5)]);

        let orders = history(&store, &backend, Some("auth_1")).await;
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].total, 6.0);
    }

    #[tokio::test]
    async fn backend_failure_still_shows_pending_orders() {
        let store = MemoryStore::default();
        json::write(&store, keys::PENDING_ORDERS, &vec![local("1700000000000", 0)])
            .await
            .unwrap();
        let backend = MockBackend::new();
        backend
            .expect_list_orders()
            .return_err(BackendError::Unreachable("down".into()));

        let orders = history(&store, &backend, Some("auth_1")).await;
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, "1700000000000");
    }

    #[tokio::test]
    async fn anonymous_history_skips_the_backend() {
        let store = Arc::new(MemoryStore::default());
        let backend = MockBackend::new();

        let orders = history(store.as_ref(), &backend, None).await;
        assert!(orders.is_empty());
        assert!(backend.calls().is_empty());
    }
}
