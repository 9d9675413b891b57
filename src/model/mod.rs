//! Pure data structures shared across the ordering core.

pub mod admin;
pub mod cart;
pub mod identity;
pub mod order;
pub mod price;
pub mod product;

pub use admin::*;
pub use cart::*;
pub use identity::*;
pub use order::*;
pub use product::*;
