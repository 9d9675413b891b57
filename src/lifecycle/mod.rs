//! Wiring and observability for a running storefront.

pub mod storefront;
pub mod tracing;

pub use storefront::Storefront;
pub use tracing::setup_tracing;
