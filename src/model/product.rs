//! Catalog products and vendor tags.

use serde::{Deserialize, Serialize};

/// Which storefront a locally registered product belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Vendor {
    /// The snack bar storefront.
    Snackbar,
    /// The school café storefront.
    SchoolCafe,
}

/// A product as supplied by the Catalog Provider.
///
/// The core only reads products; it copies the fields it needs into a
/// [`CartLine`](crate::model::CartLine) when the user adds one to the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub unit_price: f64,
    pub price_label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_ref: Option<String>,
    #[serde(default)]
    pub category: String,
    /// Set for locally registered products; builtin menu items carry `None`.
    #[serde(default)]
    pub vendor: Option<Vendor>,
}
