//! # Observability & Tracing
//!
//! Structured logging setup for the whole storefront, built on the
//! `tracing` crate.
//!
//! ## Configuration
//!
//! Log levels come from the `RUST_LOG` environment variable. The compact
//! format hides module paths (`with_target(false)`); log lines carry their
//! context as structured fields instead.
//!
//! ```bash
//! # Compact logs (default)
//! RUST_LOG=info cargo run
//!
//! # Show request payloads and soft-failure details
//! RUST_LOG=debug cargo run
//!
//! # Filter to the cart actor only
//! RUST_LOG=cantina::cart=debug cargo run
//! ```
//!
//! ## What Gets Traced
//!
//! - **Actor lifecycle**: cart actor startup (with restored line count) and
//!   shutdown
//! - **Cart mutations**: every add/merge, quantity change, removal, and
//!   snapshot persistence fault
//! - **Checkout**: the chosen destination, item batch failures, admin mirror
//!   outcomes
//! - **Soft failures**: every read that fell back to an empty value logs a
//!   `warn` with the key and reason; fail-soft never means fail-silent
//!
//! A typical offline checkout at `RUST_LOG=info`:
//!
//! ```text
//! INFO Cart actor started lines=0
//! INFO Line added product_id="5" quantity=2
//! WARN Remote order insert failed, saving locally error=backend unreachable: offline
//! INFO Cart cleared
//! INFO Order saved locally order_id="1759752000000" total=6.0
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
