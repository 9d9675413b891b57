//! # Checkout Orchestrator
//!
//! One-shot, best-effort conversion of a cart into a durable order with a
//! non-blocking administrative audit trail.
//!
//! ## The Flow
//!
//! 1. Reject an empty cart before anything else touches storage.
//! 2. Resolve the acting identity: backend session, then cached auth user,
//!    then cached profile, then anonymous.
//! 3. Insert the order header remotely. Every failure, whether transport or
//!    rejection, is treated uniformly as "remote unavailable".
//! 4. On success, batch-insert one order item per cart line. Item-level
//!    failures are logged and accepted: an order may end up with fewer items
//!    than the cart had.
//! 5. On failure, append an order with embedded lines to the local
//!    pending-orders list. If *that* write also fails, checkout fails hard:
//!    at that point no durable record exists anywhere.
//! 6. Derive one [`AdminRecord`] per cart line (on both paths) and persist
//!    the batch locally.
//! 7. Mirror the batch to the backend as a detached task. Its failure
//!    channel is the log, never the checkout result.
//! 8. Clear the cart and report where the order landed.
//!
//! There is no retry, no timeout, and no cancellation: once invoked,
//! checkout runs to completion or failure.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::admin;
use crate::backend::BackendService;
use crate::cart::{CartClient, CartError};
use crate::model::{
    cart_total, AdminRecord, AuthUser, CartLine, Identity, LocalOrder, NewOrder, NewOrderItem,
    OrderStatus, Profile,
};
use crate::store::{json, keys, LocalStore, StoreError};

/// Where the order ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDestination {
    /// The backend accepted the order header.
    Remote,
    /// The backend was unavailable; the order is in the local pending list.
    LocalFallback,
}

/// Result of a successful (or soft-successful) checkout.
#[derive(Debug)]
pub struct CheckoutReceipt {
    pub order_id: String,
    pub destination: OrderDestination,
    /// Handle for the detached admin-record mirror task. `None` on the
    /// fallback path. Failures are logged, never surfaced; tests may await
    /// the handle for determinism.
    pub mirror: Option<JoinHandle<()>>,
}

/// Errors surfaced by [`CheckoutOrchestrator::place_order`].
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout requires a non-empty cart. Nothing was written.
    #[error("cart is empty")]
    EmptyCart,

    /// Neither the backend nor local storage accepted the order; no durable
    /// record exists anywhere.
    #[error("order could not be stored anywhere: {0}")]
    Storage(#[from] StoreError),

    /// The cart actor is no longer running.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Orchestrates the one-shot cart → order transition.
pub struct CheckoutOrchestrator<S: LocalStore, B: BackendService> {
    cart: CartClient,
    store: Arc<S>,
    backend: Arc<B>,
}

impl<S: LocalStore, B: BackendService> CheckoutOrchestrator<S, B> {
    pub fn new(cart: CartClient, store: Arc<S>, backend: Arc<B>) -> Self {
        Self {
            cart,
            store,
            backend,
        }
    }

    /// Convert the current cart into a durable order.
    ///
    /// At most one attempt per invocation; no automatic retry. The cart is
    /// cleared on both the remote and the fallback path.
    #[instrument(skip(self))]
    pub async fn place_order(&self) -> Result<CheckoutReceipt, CheckoutError> {
        let lines = self.cart.lines().await?;
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let total = cart_total(&lines);
        let identity = self.resolve_identity().await;
        debug!(total, lines = lines.len(), "Placing order");

        let header = NewOrder {
            user_id: identity.profile_id.clone(),
            auth_user_id: identity.auth_user_id.clone(),
            total,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };

        match self.backend.insert_order(header).await {
            Ok(remote) => {
                let items: Vec<NewOrderItem> = lines
                    .iter()
                    .map(|line| NewOrderItem::from_line(&remote.id, line))
                    .collect();
                // Accepted partial failure: the order header is kept even if
                // some or all item rows never land.
                if let Err(e) = self.backend.insert_order_items(items).await {
                    warn!(order_id = %remote.id, error = %e, "Order item insert failed");
                }

                let records = derive_admin_records(&lines, Some(&remote.id), &identity);
                if let Err(e) = admin::append(self.store.as_ref(), &records).await {
                    warn!(error = %e, "Admin record persistence failed");
                }
                let mirror = self.spawn_mirror(&records);

                if let Err(e) = self.cart.clear().await {
                    warn!(error = %e, "Cart clear failed after checkout");
                }
                info!(order_id = %remote.id, total, "Order placed remotely");
                Ok(CheckoutReceipt {
                    order_id: remote.id,
                    destination: OrderDestination::Remote,
                    mirror: Some(mirror),
                })
            }
            Err(e) => {
                warn!(error = %e, "Remote order insert failed, saving locally");
                self.save_locally(lines, total, identity).await
            }
        }
    }

    /// The fallback path: a locally identified order with embedded lines.
    async fn save_locally(
        &self,
        lines: Vec<CartLine>,
        total: f64,
        identity: Identity,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        let local = LocalOrder {
            id: local_order_id(),
            user_id: identity.profile_id.clone(),
            auth_user_id: identity.auth_user_id.clone(),
            total,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            lines: lines.clone(),
        };

        let mut pending: Vec<LocalOrder> =
            json::read_list_soft(self.store.as_ref(), keys::PENDING_ORDERS).await;
        pending.push(local.clone());
        // The only hard failure: with this write gone, no durable record of
        // the order exists anywhere and the user must be told.
        json::write(self.store.as_ref(), keys::PENDING_ORDERS, &pending).await?;

        let records = derive_admin_records(&lines, Some(&local.id), &identity);
        if let Err(e) = admin::append(self.store.as_ref(), &records).await {
            warn!(error = %e, "Admin record persistence failed");
        }

        if let Err(e) = self.cart.clear().await {
            warn!(error = %e, "Cart clear failed after checkout");
        }
        info!(order_id = %local.id, total, "Order saved locally");
        Ok(CheckoutReceipt {
            order_id: local.id,
            destination: OrderDestination::LocalFallback,
            mirror: None,
        })
    }

    /// Prefer the live session, then the cached auth user; the cached
    /// profile contributes the registered id and display name either way.
    async fn resolve_identity(&self) -> Identity {
        let auth: Option<AuthUser> = match self.backend.current_auth_user().await {
            Ok(user) => user,
            Err(e) => {
                debug!(error = %e, "Auth lookup failed, trying cached identity");
                None
            }
        };
        let auth = match auth {
            Some(user) => Some(user),
            None => json::read_soft(self.store.as_ref(), keys::AUTH_USER).await,
        };
        let profile: Option<Profile> = json::read_soft(self.store.as_ref(), keys::PROFILE).await;

        Identity {
            auth_user_id: auth.as_ref().map(|u| u.id.clone()),
            profile_id: profile.as_ref().map(|p| p.id.clone()),
            display_name: profile.as_ref().and_then(|p| p.name.clone()),
            email: auth.as_ref().and_then(|u| u.email.clone()),
        }
    }

    /// Dispatch the admin-record mirror without awaiting it. The caller's
    /// success is already decided; this task only ever logs.
    fn spawn_mirror(&self, records: &[AdminRecord]) -> JoinHandle<()> {
        let uploads: Vec<_> = records.iter().map(AdminRecord::upload).collect();
        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            let count = uploads.len();
            match backend.insert_admin_records(uploads).await {
                Ok(()) => debug!(count, "Admin records mirrored"),
                Err(e) => warn!(count, error = %e, "Admin record mirror failed"),
            }
        })
    }
}

/// Time-based token identifying a locally persisted order.
fn local_order_id() -> String {
    Utc::now().timestamp_millis().to_string()
}

/// One audit record per cart line, quantity-preserving.
///
/// `names` holds one slot per unit ordered, every slot filled with the
/// acting user's label. The slots exist so a shared item can later carry one
/// name per recipient; until then the occupant is the same in each.
pub fn derive_admin_records(
    lines: &[CartLine],
    order_id: Option<&str>,
    identity: &Identity,
) -> Vec<AdminRecord> {
    let stamp = Utc::now();
    let label = identity.display_label();
    lines
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            let names = vec![label.clone(); line.quantity as usize];
            AdminRecord {
                id: format!("adm_{}_{}", stamp.timestamp_millis(), idx),
                order_id: order_id.map(str::to_string),
                admin_user_id: identity.auth_user_id.clone(),
                user_id: identity.profile_id.clone(),
                product_id: Some(line.id.clone()),
                title: line.title.clone(),
                quantity: line.quantity,
                note: names.join(", "),
                names,
                action: "order".to_string(),
                status: "created".to_string(),
                created_at: stamp,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, unit_price: f64, quantity: u32) -> CartLine {
        CartLine {
            id: id.to_string(),
            title: format!("Item {id}"),
            unit_price,
            price_label: crate::model::price::format_label(unit_price),
            image_ref: None,
            quantity,
        }
    }

    #[test]
    fn one_record_per_line_with_one_name_per_unit() {
        let identity = Identity {
            auth_user_id: Some("auth_1".into()),
            profile_id: Some("u_1".into()),
            display_name: Some("Giovanna".into()),
            email: None,
        };
        let lines = [line("5", 3.0, 2), line("1", 8.5, 3)];

        let records = derive_admin_records(&lines, Some("ord_1"), &identity);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].names.len(), 2);
        assert_eq!(records[1].names.len(), 3);
        assert!(records[1].names.iter().all(|n| n == "Giovanna"));
        assert_eq!(records[0].note, "Giovanna, Giovanna");
        assert_eq!(records[0].order_id.as_deref(), Some("ord_1"));
        assert_ne!(records[0].id, records[1].id);
    }

    #[test]
    fn anonymous_identity_uses_the_guest_label() {
        let records = derive_admin_records(&[line("13", 3.0, 1)], None, &Identity::anonymous());
        assert_eq!(records[0].names, vec!["Guest"]);
        assert_eq!(records[0].order_id, None);
        assert_eq!(records[0].admin_user_id, None);
    }
}
