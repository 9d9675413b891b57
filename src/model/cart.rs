//! Cart lines and snapshot normalization.
//!
//! The cart is persisted as a whole JSON snapshot on every mutation. Loading
//! is deliberately lenient: snapshots written by older app versions may carry
//! prices as strings, omit the quantity, or store non-positive quantities.
//! [`StoredCartLine`] accepts all of these and [`StoredCartLine::normalize`]
//! coerces them into a valid [`CartLine`].

use serde::{Deserialize, Serialize};

use crate::model::price;
use crate::model::product::Product;

/// One entry in the shopping cart.
///
/// Display fields (`title`, `price_label`, `image_ref`) are copied from the
/// catalog when the line is added and never re-resolved afterwards.
///
/// Invariant: a cart holds at most one `CartLine` per distinct `id`; adding
/// the same product again merges into the existing line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product id, stable across catalog sources.
    pub id: String,
    pub title: String,
    /// Non-negative unit price, copied at add time.
    pub unit_price: f64,
    /// Pre-formatted display price, copied at add time.
    pub price_label: String,
    /// Opaque image reference; the core never interprets it.
    #[serde(default)]
    pub image_ref: Option<String>,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartLine {
    /// Build a new line from a catalog product. `quantity` is clamped to 1.
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            unit_price: product.unit_price,
            price_label: product.price_label.clone(),
            image_ref: product.image_ref.clone(),
            quantity: quantity.max(1),
        }
    }

    /// Line subtotal: `unit_price × quantity`.
    pub fn subtotal(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// Sum of line subtotals. Recomputed on demand, never cached.
pub fn cart_total(lines: &[CartLine]) -> f64 {
    lines.iter().map(CartLine::subtotal).sum()
}

/// A number that may have been persisted as a JSON number or a string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LenientNumber {
    Num(f64),
    Text(String),
}

impl LenientNumber {
    /// Numeric value, if one can be recovered.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            LenientNumber::Num(n) if n.is_finite() => Some(*n),
            LenientNumber::Num(_) => None,
            LenientNumber::Text(s) => s.trim().parse().ok().filter(|n: &f64| n.is_finite()),
        }
    }
}

/// Persisted shape of a cart line, tolerant of older snapshot formats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCartLine {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub unit_price: Option<LenientNumber>,
    #[serde(default)]
    pub price_label: Option<String>,
    #[serde(default)]
    pub image_ref: Option<String>,
    #[serde(default)]
    pub quantity: Option<LenientNumber>,
}

impl StoredCartLine {
    /// Coerce a stored line into a valid [`CartLine`].
    ///
    /// `unit_price` defaults to `0.0` when absent or non-numeric; `quantity`
    /// defaults to 1 when absent or non-positive; a missing label is rebuilt
    /// from the unit price.
    pub fn normalize(self) -> CartLine {
        let unit_price = self
            .unit_price
            .and_then(|p| p.as_f64())
            .filter(|p| *p >= 0.0)
            .unwrap_or(0.0);
        let quantity = self
            .quantity
            .and_then(|q| q.as_f64())
            .map(|q| q.floor())
            .filter(|q| *q >= 1.0)
            .map(|q| if q > f64::from(u32::MAX) { u32::MAX } else { q as u32 })
            .unwrap_or(1);
        let price_label = self
            .price_label
            .unwrap_or_else(|| price::format_label(unit_price));
        CartLine {
            id: self.id,
            title: self.title,
            unit_price,
            price_label,
            image_ref: self.image_ref,
            quantity,
        }
    }
}

impl From<CartLine> for StoredCartLine {
    fn from(line: CartLine) -> Self {
        Self {
            id: line.id,
            title: line.title,
            unit_price: Some(LenientNumber::Num(line.unit_price)),
            price_label: Some(line.price_label),
            image_ref: line.image_ref,
            quantity: Some(LenientNumber::Num(f64::from(line.quantity))),
        }
    }
}
