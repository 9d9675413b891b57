//! Administrative audit records.
//!
//! One [`AdminRecord`] is derived per cart line at checkout, regardless of
//! whether the order landed remotely or in the local fallback list. The
//! remote copy travels as [`AdminRecordUpload`], whose `metadata` carries the
//! denormalized product fields so a later sync can reconstruct the full
//! record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn default_action() -> String {
    "order".to_string()
}

fn default_status() -> String {
    "created".to_string()
}

/// Denormalized audit row generated once per cart line at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminRecord {
    /// Locally generated, unique per record (`adm_<millis>_<index>`).
    pub id: String,
    /// Order this record was derived from; `None` if order creation returned
    /// no id.
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub admin_user_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,
    pub title: String,
    pub quantity: u32,
    /// One entry per unit ordered; every entry is the acting user's label.
    #[serde(default)]
    pub names: Vec<String>,
    /// `names` joined by `", "`, kept redundantly for display-only consumers.
    #[serde(default)]
    pub note: String,
    #[serde(default = "default_action")]
    pub action: String,
    #[serde(default = "default_status")]
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Product fields nested under `metadata` in the remote shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminMetadata {
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub names: Vec<String>,
}

/// Remote row shape for the `admin_records` collection.
///
/// The local record id is included so that a remote sync merges back onto
/// the same record instead of duplicating it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminRecordUpload {
    pub id: String,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub admin_user_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default = "default_action")]
    pub action: String,
    #[serde(default)]
    pub note: String,
    #[serde(default = "default_status")]
    pub status: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub metadata: AdminMetadata,
}

impl AdminRecord {
    /// Remote shape of this record, with the product fields folded into
    /// `metadata`.
    pub fn upload(&self) -> AdminRecordUpload {
        AdminRecordUpload {
            id: self.id.clone(),
            order_id: self.order_id.clone(),
            admin_user_id: self.admin_user_id.clone(),
            user_id: self.user_id.clone(),
            action: self.action.clone(),
            note: self.note.clone(),
            status: self.status.clone(),
            created_at: self.created_at,
            metadata: AdminMetadata {
                product_id: self.product_id.clone(),
                title: Some(self.title.clone()),
                quantity: self.quantity,
                names: self.names.clone(),
            },
        }
    }

    /// Normalize a remote row back into the local record shape.
    ///
    /// Missing `names` fall back to splitting `note` on commas, mirroring
    /// how display consumers read these rows.
    pub fn from_upload(upload: AdminRecordUpload) -> Self {
        let names = if upload.metadata.names.is_empty() && !upload.note.is_empty() {
            upload
                .note
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        } else {
            upload.metadata.names
        };
        AdminRecord {
            id: upload.id,
            order_id: upload.order_id,
            admin_user_id: upload.admin_user_id,
            user_id: upload.user_id,
            product_id: upload.metadata.product_id,
            title: upload.metadata.title.unwrap_or_default(),
            quantity: upload.metadata.quantity,
            names,
            note: upload.note,
            action: upload.action,
            status: upload.status,
            created_at: upload.created_at,
        }
    }
}
