//! Error types for the cart actor.

use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during cart operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    /// The cart actor's channel is closed.
    #[error("cart actor closed")]
    ActorClosed,

    /// The cart actor dropped the response channel.
    #[error("cart actor dropped response")]
    ActorDropped,

    /// The mutation was applied in memory but the snapshot could not be
    /// persisted. The running session keeps the mutation; only durability is
    /// degraded.
    #[error("cart snapshot persistence failed: {0}")]
    Persistence(#[from] StoreError),

    /// No cart line exists for the given product id.
    #[error("no cart line for product '{0}'")]
    UnknownLine(String),
}
