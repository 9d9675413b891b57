use std::sync::Arc;

use tracing::{error, info};

use crate::admin::AdminLedger;
use crate::backend::BackendService;
use crate::cart::CartClient;
use crate::catalog::{builtin_menu, StoreCatalog};
use crate::checkout::CheckoutOrchestrator;
use crate::model::{AuthUser, Order};
use crate::orders;
use crate::store::{json, keys, LocalStore};

/// The assembled storefront: every component wired to one store and one
/// backend.
///
/// `Storefront` is responsible for:
/// - **Lifecycle Management**: starting the cart actor and shutting it down
/// - **Dependency Wiring**: handing the same store and backend to checkout,
///   the admin ledger, and the catalog
///
/// # Example
///
/// ```ignore
/// let storefront = Storefront::new(store, backend);
///
/// storefront.cart.add(&product, 2).await?;
/// let receipt = storefront.checkout.place_order().await?;
///
/// storefront.shutdown().await?;
/// ```
pub struct Storefront<S: LocalStore, B: BackendService> {
    /// Client for the cart actor.
    pub cart: CartClient,

    /// Converts the cart into an order.
    pub checkout: CheckoutOrchestrator<S, B>,

    /// The administrative audit trail and its remote sync.
    pub admin: AdminLedger<S, B>,

    /// Product listing over the builtin menu plus local registrations.
    pub catalog: StoreCatalog<S>,

    store: Arc<S>,
    backend: Arc<B>,

    /// Task handles for running actors (used for graceful shutdown).
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl<S: LocalStore, B: BackendService> Storefront<S, B> {
    /// Spawn the cart actor and wire every component to `store` and
    /// `backend`.
    pub fn new(store: Arc<S>, backend: Arc<B>) -> Self {
        let (cart_actor, cart) = crate::cart::new(Arc::clone(&store));
        let cart_handle = tokio::spawn(cart_actor.run());

        let checkout =
            CheckoutOrchestrator::new(cart.clone(), Arc::clone(&store), Arc::clone(&backend));
        let admin = AdminLedger::new(Arc::clone(&store), Arc::clone(&backend));
        let catalog = StoreCatalog::new(Arc::clone(&store), builtin_menu());

        Self {
            cart,
            checkout,
            admin,
            catalog,
            store,
            backend,
            handles: vec![cart_handle],
        }
    }

    /// Orders for the current user, remote and locally pending merged,
    /// newest first.
    ///
    /// The session is resolved like checkout does: live backend session
    /// first, then the cached auth user. With neither, only locally pending
    /// orders are shown.
    pub async fn order_history(&self) -> Vec<Order> {
        let auth: Option<AuthUser> = match self.backend.current_auth_user().await {
            Ok(user) => user,
            Err(_) => None,
        };
        let auth = match auth {
            Some(user) => Some(user),
            None => json::read_soft(self.store.as_ref(), keys::AUTH_USER).await,
        };
        orders::history(
            self.store.as_ref(),
            self.backend.as_ref(),
            auth.as_ref().map(|u| u.id.as_str()),
        )
        .await
    }

    /// Gracefully shut the storefront down.
    ///
    /// Dropping the cart client (and the checkout orchestrator, which holds
    /// a clone) closes the actor's channel; the actor drains any queued
    /// requests and exits its loop. Returns an error if the actor task
    /// panicked.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down storefront...");

        drop(self.cart);
        drop(self.checkout);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("Storefront shutdown complete.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::OfflineBackend;
    use crate::catalog::CatalogProvider;
    use crate::checkout::OrderDestination;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn offline_storefront_checks_out_to_the_fallback_list() {
        let store = Arc::new(MemoryStore::default());
        let storefront = Storefront::new(store, Arc::new(OfflineBackend));

        let menu = storefront.catalog.list_items(None).await;
        storefront.cart.add(&menu[0], 1).await.unwrap();

        let receipt = storefront.checkout.place_order().await.unwrap();
        assert_eq!(receipt.destination, OrderDestination::LocalFallback);

        let history = storefront.order_history().await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, receipt.order_id);

        storefront.shutdown().await.unwrap();
    }
}
