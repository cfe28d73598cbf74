//! Campaign types for the merchant REST API.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A merchant campaign.
///
/// Reward rules and accounting are server-side; this type only carries what
/// the backend reports. The backend may send `id`, `campaignId`, or both;
/// read through [`Campaign::identifier`]. Unknown fields are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "super::opt_id_string")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "super::opt_id_string")]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "super::opt_id_string")]
    pub merchant_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// On-chain campaign account (Base58)
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub commission: Option<Decimal>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Campaign {
    /// `id`, falling back to `campaignId`.
    pub fn identifier(&self) -> Option<&str> {
        self.id.as_deref().or(self.campaign_id.as_deref())
    }

    /// Display name, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or_else(|| self.identifier())
            .unwrap_or_default()
    }
}
