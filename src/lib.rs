#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Cantina
//!
//! > **The ordering core of a school cafeteria storefront app.**
//!
//! This crate implements the cart/order reconciliation subsystem behind the
//! storefront UI: a locally persisted shopping cart, a checkout that commits
//! the cart into a durable order record, and the administrative audit trail
//! derived from every order. Screens, navigation, and image handling live in
//! the app shell; the core talks to the outside world through two seams, a
//! **Catalog Provider** (read-only product listing) and a **Backend Service**
//! (remote persistence + auth).
//!
//! ## 🏗️ Design Philosophy
//!
//! ### One actor per cart
//!
//! The cart is the only mutable entity the UI touches, and every mutation
//! must persist a whole snapshot before the caller moves on. Running the cart
//! as a Tokio task that processes requests sequentially gives us both for
//! free:
//! - **No locks**: the actor owns its `Vec<CartLine>` exclusively.
//! - **Snapshot consistency**: each request is handled (mutate, persist,
//!   reply) before the next one starts.
//!
//! ### Fall back, don't fail
//!
//! The backend is a phone's network away. Checkout treats every remote
//! failure uniformly as "remote unavailable" and falls back to a local
//! pending-orders list. The user sees only two states: order confirmed
//! (remotely or locally) and order failed (nothing durable anywhere).
//!
//! ### Mocking: testing without pain
//!
//! [`backend::MockBackend`] and the store doubles in [`store::mock`] let
//! tests script remote failures and count storage writes deterministically.
//! See those modules for a complete guide.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Data ([`model`])
//! Pure data structures: [`CartLine`](model::CartLine),
//! [`Order`](model::Order), [`AdminRecord`](model::AdminRecord), and friends.
//!
//! ### 2. The Seams ([`store`], [`backend`], [`catalog`])
//! Traits for the device key-value store, the remote relational backend, and
//! the product listing, each with in-tree implementations and test doubles.
//!
//! ### 3. The Cart ([`cart`])
//! The cart actor and its cloneable [`CartClient`](cart::CartClient).
//!
//! ### 4. The Orchestrator ([`checkout`])
//! One-shot, best-effort conversion of a cart into a durable order, with the
//! admin-record mirror dispatched as an explicitly detached task.
//!
//! ### 5. The Back Office ([`admin`], [`orders`])
//! Administrative ledger (local list + remote sync merged by id) and the
//! merged remote/local order history.
//!
//! ### 6. The Wiring ([`lifecycle`])
//! [`Storefront`](lifecycle::Storefront) spins everything up for one user
//! session and shuts it down gracefully.
//!
//! ## 🚀 Quick Start
//!
//! ```ignore
//! let store = Arc::new(MemoryStore::default());
//! let backend = Arc::new(OfflineBackend);
//! let front = Storefront::new(store, backend);
//!
//! let menu = front.catalog.list_items(None).await;
//! front.cart.add(&menu[0], 2).await?;
//! let receipt = front.checkout.place_order().await?;
//!
//! front.shutdown().await?;
//! ```
//!
//! ### Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

pub mod admin;
pub mod backend;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod lifecycle;
pub mod model;
pub mod orders;
pub mod store;
