//! # Cart Manager
//!
//! The authoritative local cart, run as a message-loop actor.
//!
//! ## Key Types
//!
//! - [`CartActor`]: owns the `Vec<CartLine>` and the receiver end of the
//!   request channel; persists a whole snapshot after every mutation.
//! - [`CartClient`]: cloneable, type-safe handle used by the UI and the
//!   checkout orchestrator.
//! - [`CartError`]: operation errors, including the persisted-but-degraded
//!   case ([`CartError::Persistence`]).
//!
//! ## Concurrency Model
//!
//! One actor per user session. Requests are processed strictly sequentially,
//! so the cart needs no locks: the actor's exclusive ownership of its state
//! is the synchronization.

pub mod actor;
pub mod client;
pub mod error;

pub use actor::{load, CartActor, CartRequest};
pub use client::CartClient;
pub use error::CartError;

use std::sync::Arc;

use crate::store::LocalStore;

/// Creates a new cart actor and its client.
///
/// The actor does not run until [`CartActor::run`] is awaited (normally via
/// `tokio::spawn`); the loaded snapshot is read from `store` at startup.
pub fn new<S: LocalStore>(store: Arc<S>) -> (CartActor<S>, CartClient) {
    let (sender, receiver) = tokio::sync::mpsc::channel(32);
    (CartActor::new(receiver, store), CartClient::new(sender))
}
