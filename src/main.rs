//! Offline walkthrough of the storefront.
//!
//! Runs the whole flow against a file-backed store and an unreachable
//! backend: browse the menu, build a cart, check out into the local
//! fallback list, and inspect the resulting audit records.

use std::sync::Arc;

use cantina::backend::OfflineBackend;
use cantina::catalog::CatalogProvider;
use cantina::lifecycle::{setup_tracing, Storefront};
use cantina::store::JsonFileStore;
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    info!("Starting offline storefront demo");

    let data_dir = std::env::temp_dir().join("cantina-demo");
    let store = JsonFileStore::open(data_dir)
        .await
        .map_err(|e| e.to_string())?;
    let storefront = Storefront::new(Arc::new(store), Arc::new(OfflineBackend));

    let menu = storefront.catalog.list_items(None).await;
    info!(items = menu.len(), "Menu loaded");

    let span = tracing::info_span!("cart_building");
    let total = async {
        let pao = menu
            .iter()
            .find(|p| p.id == "5")
            .ok_or("menu item missing")?;
        let cafe = menu
            .iter()
            .find(|p| p.id == "7")
            .ok_or("menu item missing")?;

        storefront
            .cart
            .add(pao, 2)
            .await
            .map_err(|e| e.to_string())?;
        storefront
            .cart
            .add(cafe, 1)
            .await
            .map_err(|e| e.to_string())?;
        storefront
            .cart
            .increment(&cafe.id)
            .await
            .map_err(|e| e.to_string())?;

        storefront.cart.total().await.map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;

    info!(total, "Cart ready");

    let span = tracing::info_span!("checkout");
    let receipt = async {
        info!("Placing order with the backend offline");
        storefront
            .checkout
            .place_order()
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;

    info!(
        order_id = %receipt.order_id,
        destination = ?receipt.destination,
        "Order placed"
    );

    for record in storefront.admin.records().await {
        info!(
            record_id = %record.id,
            title = %record.title,
            quantity = record.quantity,
            note = %record.note,
            "Audit record"
        );
    }

    let history = storefront.order_history().await;
    info!(orders = history.len(), "Order history");

    storefront.shutdown().await?;

    info!("Demo completed successfully");
    Ok(())
}
