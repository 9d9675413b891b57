//! Acting-user identity records.
//!
//! The login flow caches two records in the Local Store: the auth-service
//! user (id + email) and the registered profile row (id + display name).
//! Checkout resolves whichever of the two it can find; anonymous orders are
//! allowed when neither exists.

use serde::{Deserialize, Serialize};

/// Label used when no display name or email can be resolved.
pub const ANONYMOUS_LABEL: &str = "Guest";

/// Auth-service user cached locally after login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Registered profile row cached locally after registration or login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// The identity acting at checkout time, after resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Identity {
    pub auth_user_id: Option<String>,
    pub profile_id: Option<String>,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl Identity {
    /// Anonymous identity, used when no session or cached record exists.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Display label for audit records: profile name, then email, then
    /// [`ANONYMOUS_LABEL`].
    pub fn display_label(&self) -> String {
        self.display_name
            .clone()
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| ANONYMOUS_LABEL.to_string())
    }
}
