//! The cart actor: exclusive owner of the in-memory cart and its snapshot.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use super::error::CartError;
use crate::model::{cart_total, CartLine, StoredCartLine};
use crate::store::{json, keys, LocalStore, StoreError};

/// One-shot response channel used by cart requests.
pub type Response<T> = oneshot::Sender<Result<T, CartError>>;

/// Requests handled by the cart actor.
///
/// Every mutating variant persists the whole snapshot before replying; the
/// read-only variants (`Lines`, `Total`) never touch the store.
#[derive(Debug)]
pub enum CartRequest {
    /// Merge `line` into the cart. `line.quantity` is the quantity delta,
    /// clamped to at least 1 per call.
    Add {
        line: CartLine,
        respond_to: Response<CartLine>,
    },
    /// Set a line's quantity, clamped to at least 1.
    SetQuantity {
        product_id: String,
        quantity: u32,
        respond_to: Response<CartLine>,
    },
    Increment {
        product_id: String,
        respond_to: Response<CartLine>,
    },
    /// Decrement floors at 1; removal is a separate explicit action.
    Decrement {
        product_id: String,
        respond_to: Response<CartLine>,
    },
    Remove {
        product_id: String,
        respond_to: Response<()>,
    },
    Clear {
        respond_to: Response<()>,
    },
    /// Snapshot of the current lines, in insertion order.
    Lines {
        respond_to: Response<Vec<CartLine>>,
    },
    /// `Σ(unit_price × quantity)`, recomputed on demand.
    Total {
        respond_to: Response<f64>,
    },
}

/// Read the persisted cart snapshot, failing soft to an empty cart.
///
/// Each stored line is normalized: quantity defaults to 1 when absent or
/// non-positive, unit price to 0 when absent or non-numeric.
pub async fn load<S: LocalStore + ?Sized>(store: &S) -> Vec<CartLine> {
    json::read_list_soft::<StoredCartLine, S>(store, keys::CART)
        .await
        .into_iter()
        .map(StoredCartLine::normalize)
        .collect()
}

/// The actor owning the cart state.
///
/// # Failure Semantics
///
/// A persistence fault during a mutation is reported to the caller as
/// [`CartError::Persistence`], but the in-memory cart keeps the mutation:
/// a transient store fault must not lose the user's change for the running
/// session.
pub struct CartActor<S: LocalStore> {
    receiver: mpsc::Receiver<CartRequest>,
    lines: Vec<CartLine>,
    store: Arc<S>,
}

impl<S: LocalStore> CartActor<S> {
    pub(super) fn new(receiver: mpsc::Receiver<CartRequest>, store: Arc<S>) -> Self {
        Self {
            receiver,
            lines: Vec::new(),
            store,
        }
    }

    /// Runs the actor's event loop until the channel closes.
    pub async fn run(mut self) {
        self.lines = load(self.store.as_ref()).await;
        info!(lines = self.lines.len(), "Cart actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CartRequest::Add { line, respond_to } => {
                    debug!(product_id = %line.id, delta = line.quantity, "Add");
                    let result = self.add(line).await;
                    let _ = respond_to.send(result);
                }
                CartRequest::SetQuantity {
                    product_id,
                    quantity,
                    respond_to,
                } => {
                    debug!(%product_id, quantity, "SetQuantity");
                    let result = self.set_quantity(&product_id, quantity.max(1)).await;
                    let _ = respond_to.send(result);
                }
                CartRequest::Increment {
                    product_id,
                    respond_to,
                } => {
                    debug!(%product_id, "Increment");
                    let result = self.adjust(&product_id, 1).await;
                    let _ = respond_to.send(result);
                }
                CartRequest::Decrement {
                    product_id,
                    respond_to,
                } => {
                    debug!(%product_id, "Decrement");
                    let result = self.adjust(&product_id, -1).await;
                    let _ = respond_to.send(result);
                }
                CartRequest::Remove {
                    product_id,
                    respond_to,
                } => {
                    debug!(%product_id, "Remove");
                    let result = self.remove(&product_id).await;
                    let _ = respond_to.send(result);
                }
                CartRequest::Clear { respond_to } => {
                    debug!("Clear");
                    self.lines.clear();
                    let result = self.persist().await.map_err(CartError::from);
                    info!("Cart cleared");
                    let _ = respond_to.send(result);
                }
                CartRequest::Lines { respond_to } => {
                    let _ = respond_to.send(Ok(self.lines.clone()));
                }
                CartRequest::Total { respond_to } => {
                    let _ = respond_to.send(Ok(cart_total(&self.lines)));
                }
            }
        }

        info!(lines = self.lines.len(), "Cart actor shutdown");
    }

    /// Merge-on-add: at most one line per product id.
    async fn add(&mut self, line: CartLine) -> Result<CartLine, CartError> {
        let delta = line.quantity.max(1);
        let merged = match self.lines.iter_mut().find(|l| l.id == line.id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(delta);
                info!(product_id = %existing.id, quantity = existing.quantity, "Line merged");
                existing.clone()
            }
            None => {
                let mut line = line;
                line.quantity = delta;
                info!(product_id = %line.id, quantity = line.quantity, "Line added");
                self.lines.push(line.clone());
                line
            }
        };
        self.persist().await?;
        Ok(merged)
    }

    async fn set_quantity(&mut self, product_id: &str, quantity: u32) -> Result<CartLine, CartError> {
        let line = match self.lines.iter_mut().find(|l| l.id == product_id) {
            Some(line) => {
                line.quantity = quantity;
                line.clone()
            }
            None => {
                warn!(%product_id, "Not found");
                return Err(CartError::UnknownLine(product_id.to_string()));
            }
        };
        self.persist().await?;
        Ok(line)
    }

    /// Shared increment/decrement; the resulting quantity never drops below 1.
    async fn adjust(&mut self, product_id: &str, delta: i64) -> Result<CartLine, CartError> {
        let line = match self.lines.iter_mut().find(|l| l.id == product_id) {
            Some(line) => {
                let next = i64::from(line.quantity) + delta;
                line.quantity = next.max(1) as u32;
                line.clone()
            }
            None => {
                warn!(%product_id, "Not found");
                return Err(CartError::UnknownLine(product_id.to_string()));
            }
        };
        self.persist().await?;
        Ok(line)
    }

    async fn remove(&mut self, product_id: &str) -> Result<(), CartError> {
        let before = self.lines.len();
        self.lines.retain(|l| l.id != product_id);
        if self.lines.len() == before {
            warn!(%product_id, "Not found");
            return Err(CartError::UnknownLine(product_id.to_string()));
        }
        info!(%product_id, lines = self.lines.len(), "Line removed");
        self.persist().await?;
        Ok(())
    }

    /// Persist the whole snapshot. No incremental diffing.
    async fn persist(&self) -> Result<(), StoreError> {
        let stored: Vec<StoredCartLine> = self
            .lines
            .iter()
            .cloned()
            .map(StoredCartLine::from)
            .collect();
        json::write(self.store.as_ref(), keys::CART, &stored).await
    }
}
