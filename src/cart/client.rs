//! Type-safe, cloneable handle to the cart actor.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

use super::actor::{CartRequest, Response};
use super::error::CartError;
use crate::model::{CartLine, Product};

/// Client for interacting with the cart actor.
///
/// Cloning is cheap; all clones talk to the same actor. Dropping every clone
/// closes the channel and shuts the actor down.
#[derive(Clone)]
pub struct CartClient {
    sender: mpsc::Sender<CartRequest>,
}

impl CartClient {
    pub(super) fn new(sender: mpsc::Sender<CartRequest>) -> Self {
        Self { sender }
    }

    /// Add `quantity` units of `product` (clamped to at least 1), merging
    /// into an existing line for the same product id.
    #[instrument(skip(self, product))]
    pub async fn add(&self, product: &Product, quantity: u32) -> Result<CartLine, CartError> {
        debug!(product_id = %product.id, quantity, "Sending request");
        let line = CartLine::from_product(product, quantity);
        self.request(|respond_to| CartRequest::Add { line, respond_to })
            .await
    }

    /// Set a line's quantity, clamped to at least 1.
    #[instrument(skip(self))]
    pub async fn set_quantity(
        &self,
        product_id: &str,
        quantity: u32,
    ) -> Result<CartLine, CartError> {
        debug!("Sending request");
        let product_id = product_id.to_string();
        self.request(|respond_to| CartRequest::SetQuantity {
            product_id,
            quantity,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn increment(&self, product_id: &str) -> Result<CartLine, CartError> {
        debug!("Sending request");
        let product_id = product_id.to_string();
        self.request(|respond_to| CartRequest::Increment {
            product_id,
            respond_to,
        })
        .await
    }

    /// Decrement floors at 1; use [`remove`](Self::remove) to drop a line.
    #[instrument(skip(self))]
    pub async fn decrement(&self, product_id: &str) -> Result<CartLine, CartError> {
        debug!("Sending request");
        let product_id = product_id.to_string();
        self.request(|respond_to| CartRequest::Decrement {
            product_id,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, product_id: &str) -> Result<(), CartError> {
        debug!("Sending request");
        let product_id = product_id.to_string();
        self.request(|respond_to| CartRequest::Remove {
            product_id,
            respond_to,
        })
        .await
    }

    /// Empty the cart and persist the empty snapshot.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), CartError> {
        debug!("Sending request");
        self.request(|respond_to| CartRequest::Clear { respond_to })
            .await
    }

    /// Snapshot of the current lines, in insertion order.
    pub async fn lines(&self) -> Result<Vec<CartLine>, CartError> {
        self.request(|respond_to| CartRequest::Lines { respond_to })
            .await
    }

    /// `Σ(unit_price × quantity)` over the current lines.
    pub async fn total(&self) -> Result<f64, CartError> {
        self.request(|respond_to| CartRequest::Total { respond_to })
            .await
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(Response<T>) -> CartRequest,
    ) -> Result<T, CartError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(make(respond_to))
            .await
            .map_err(|_| CartError::ActorClosed)?;
        response.await.map_err(|_| CartError::ActorDropped)?
    }
}
