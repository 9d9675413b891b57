//! Orders, order items, and the remote/local order union.
//!
//! Orders come from two places: rows the Backend Service created
//! ([`RemoteOrder`]) and fallback records written to the device when the
//! backend was unreachable ([`LocalOrder`]). Rather than merging loosely
//! typed maps, both sources are wrapped in the tagged [`SourcedOrder`] union
//! and normalized through one mapping function into the canonical [`Order`]
//! shape before any merge happens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::cart::CartLine;

/// Order lifecycle status. Only `Pending` is modeled in-core; further
/// transitions belong to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
}

/// Canonical order shape used across the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    /// Registered profile reference; `None` for anonymous orders.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Auth-service user reference; `None` for anonymous orders.
    #[serde(default)]
    pub auth_user_id: Option<String>,
    /// `Σ(unit_price × quantity)` at the moment of checkout.
    pub total: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    /// Embedded line snapshot. Populated only for orders persisted locally;
    /// remote orders keep their lines in the `order_items` collection.
    #[serde(default)]
    pub lines: Vec<CartLine>,
}

/// Payload for creating an order header remotely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrder {
    pub user_id: Option<String>,
    pub auth_user_id: Option<String>,
    pub total: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Order header row as returned by the Backend Service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteOrder {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub auth_user_id: Option<String>,
    pub total: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Fallback order persisted on the device with its lines embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalOrder {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub auth_user_id: Option<String>,
    pub total: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<CartLine>,
}

/// An order tagged with the source it was read from.
#[derive(Debug, Clone, PartialEq)]
pub enum SourcedOrder {
    Remote(RemoteOrder),
    Local(LocalOrder),
}

impl SourcedOrder {
    /// Normalize either source into the canonical [`Order`] shape.
    pub fn into_order(self) -> Order {
        match self {
            SourcedOrder::Remote(remote) => Order {
                id: remote.id,
                user_id: remote.user_id,
                auth_user_id: remote.auth_user_id,
                total: remote.total,
                status: remote.status,
                created_at: remote.created_at,
                lines: Vec::new(),
            },
            SourcedOrder::Local(local) => Order {
                id: local.id,
                user_id: local.user_id,
                auth_user_id: local.auth_user_id,
                total: local.total,
                status: local.status,
                created_at: local.created_at,
                lines: local.lines,
            },
        }
    }
}

/// One remote-persisted order line, tied to its order header by `order_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub order_id: String,
    #[serde(default)]
    pub product_id: Option<String>,
    pub title: String,
    pub price: f64,
    pub quantity: u32,
    /// Opaque metadata passed through to the backend.
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl NewOrderItem {
    /// Build the remote line for `line` under the order `order_id`.
    pub fn from_line(order_id: &str, line: &CartLine) -> Self {
        Self {
            order_id: order_id.to_string(),
            product_id: Some(line.id.clone()),
            title: line.title.clone(),
            price: line.unit_price,
            quantity: line.quantity,
            metadata: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}
