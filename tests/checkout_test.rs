//! Checkout edge cases: the empty cart, the local fallback path, and the
//! double failure where no durable record can be written anywhere.

use std::sync::Arc;

use cantina::backend::{BackendError, MockBackend};
use cantina::cart::CartClient;
use cantina::checkout::{CheckoutError, CheckoutOrchestrator, OrderDestination};
use cantina::model::{LocalOrder, Product};
use cantina::store::mock::{FailingStore, RecordingStore};
use cantina::store::{json, keys, LocalStore, MemoryStore};

fn pao_de_queijo() -> Product {
    Product {
        id: "5".to_string(),
        title: "Pão de queijo".to_string(),
        unit_price: 3.0,
        price_label: "R$ 3,00".to_string(),
        description: String::new(),
        image_ref: None,
        category: "Comida".to_string(),
        vendor: None,
    }
}

async fn spawn_cart<S: LocalStore>(store: Arc<S>) -> CartClient {
    let (actor, client) = cantina::cart::new(store);
    tokio::spawn(actor.run());
    client
}

#[tokio::test]
async fn empty_cart_is_rejected_before_any_write() {
    let store = Arc::new(RecordingStore::new(MemoryStore::default()));
    let backend = Arc::new(MockBackend::new());

    let cart = spawn_cart(store.clone()).await;
    let checkout = CheckoutOrchestrator::new(cart, store.clone(), backend.clone());

    let err = checkout.place_order().await.unwrap_err();
    assert!(matches!(err, CheckoutError::EmptyCart));

    assert_eq!(store.writes(), 0);
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn unreachable_backend_falls_back_to_the_pending_list() {
    let store = Arc::new(MemoryStore::default());
    let backend = Arc::new(MockBackend::new());
    backend.expect_auth_user().return_ok(None);
    backend
        .expect_insert_order()
        .return_err(BackendError::Unreachable("dns".to_string()));

    let cart = spawn_cart(store.clone()).await;
    cart.add(&pao_de_queijo(), 2).await.unwrap();

    let checkout = CheckoutOrchestrator::new(cart.clone(), store.clone(), backend.clone());
    let receipt = checkout.place_order().await.unwrap();
    backend.verify();

    assert_eq!(receipt.destination, OrderDestination::LocalFallback);
    assert!(receipt.mirror.is_none());

    // the order is durable locally, lines embedded
    let pending: Vec<LocalOrder> =
        json::read_list_soft(store.as_ref(), keys::PENDING_ORDERS).await;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, receipt.order_id);
    assert_eq!(pending[0].total, 6.0);
    assert_eq!(pending[0].lines.len(), 1);
    assert_eq!(pending[0].lines[0].id, "5");
    assert_eq!(pending[0].lines[0].quantity, 2);

    // audit records are derived on this path too, against the local id
    let records: Vec<cantina::model::AdminRecord> =
        json::read_list_soft(store.as_ref(), keys::ADMIN_RECORDS).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].order_id.as_deref(), Some(receipt.order_id.as_str()));
    assert_eq!(records[0].names, vec!["Guest", "Guest"]);

    assert!(cart.lines().await.unwrap().is_empty());
}

#[tokio::test]
async fn unwritable_store_fails_checkout_hard() {
    let store = Arc::new(FailingStore::failing_writes());
    let backend = Arc::new(MockBackend::new());
    backend.expect_auth_user().return_ok(None);
    backend
        .expect_insert_order()
        .return_err(BackendError::Unreachable("down".to_string()));

    let cart = spawn_cart(store.clone()).await;
    // the snapshot write fails but the line stays in memory
    assert!(cart.add(&pao_de_queijo(), 1).await.is_err());

    let checkout = CheckoutOrchestrator::new(cart.clone(), store, backend.clone());
    let err = checkout.place_order().await.unwrap_err();
    backend.verify();

    assert!(matches!(err, CheckoutError::Storage(_)));
    // the cart is not cleared: the user can retry once storage recovers
    assert_eq!(cart.lines().await.unwrap().len(), 1);
}

#[tokio::test]
async fn repeated_checkouts_accumulate_pending_orders() {
    let store = Arc::new(MemoryStore::default());
    let backend = Arc::new(MockBackend::new());
    for _ in 0..2 {
        backend.expect_auth_user().return_ok(None);
        backend
            .expect_insert_order()
            .return_err(BackendError::Unreachable("offline".to_string()));
    }

    let cart = spawn_cart(store.clone()).await;
    let checkout = CheckoutOrchestrator::new(cart.clone(), store.clone(), backend.clone());

    cart.add(&pao_de_queijo(), 1).await.unwrap();
    let first = checkout.place_order().await.unwrap();

    cart.add(&pao_de_queijo(), 3).await.unwrap();
    let second = checkout.place_order().await.unwrap();
    backend.verify();

    let pending: Vec<LocalOrder> =
        json::read_list_soft(store.as_ref(), keys::PENDING_ORDERS).await;
    assert_eq!(pending.len(), 2);
    assert_eq!(pending[0].id, first.order_id);
    assert_eq!(pending[1].id, second.order_id);
    assert_eq!(pending[1].total, 9.0);
}
