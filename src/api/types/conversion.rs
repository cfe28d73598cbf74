//! Conversion-related types for the merchant REST API.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::program::InstructionDescriptor;

/// Identifiers the backend assigned when issuing a conversion instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionStub {
    #[serde(deserialize_with = "id_string")]
    pub campaign_id: String,
    #[serde(deserialize_with = "id_string")]
    pub conversion_id: String,
}

/// Response from `GET /conversions/onchain/create/{referralId}/{publicKey}/{amount}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionInstructionResponse {
    pub instruction: InstructionDescriptor,
    pub metadata: ConversionStub,
}

/// Off-chain business metadata attached to a registered conversion.
///
/// This is exactly the body sent to `PATCH /conversions/offchain/{conversionId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionMetadata {
    pub campaign_id: String,
    pub conversion_id: String,
    pub referral_id: String,
    /// Merchant wallet that owns the conversion (Base58)
    pub owner_address: String,
    /// Reward amount pending payout
    #[serde(with = "rust_decimal::serde::float")]
    pub pending_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub business_value: Decimal,
}

/// A conversion as stored by the backend.
///
/// Backend records name the same facts differently depending on the
/// endpoint (`id` or `conversionId`, `owner` or `ownerAddress`, `amount` or
/// `pendingAmount`), sometimes both at once. Each spelling is its own
/// optional field; use the accessors to read whichever is present. Unknown
/// fields are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "opt_id_string")]
    pub conversion_id: Option<String>,
    /// Backend row id
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "opt_id_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub campaign_id: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub referral_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub business_value: Option<Decimal>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Conversion {
    /// `conversionId`, falling back to the row `id`.
    pub fn identifier(&self) -> Option<&str> {
        self.conversion_id.as_deref().or(self.id.as_deref())
    }

    pub fn owner_pubkey(&self) -> Option<&str> {
        self.owner_address.as_deref().or(self.owner.as_deref())
    }

    pub fn reward_amount(&self) -> Option<Decimal> {
        self.pending_amount.or(self.amount)
    }

    /// Decode the body of a successful metadata update.
    ///
    /// The update already happened, so this never fails: an empty or
    /// unrecognized body yields the metadata that was sent.
    pub fn from_update_response(body: &str, sent: &ConversionMetadata) -> Self {
        if body.trim().is_empty() {
            return Self::from(sent);
        }
        match serde_json::from_str::<Conversion>(body) {
            Ok(mut conversion) => {
                if conversion.identifier().is_none() {
                    conversion.conversion_id = Some(sent.conversion_id.clone());
                }
                conversion
            }
            Err(e) => {
                tracing::warn!(
                    conversion_id = %sent.conversion_id,
                    error = %e,
                    "Unrecognized metadata update response, using sent metadata"
                );
                Self::from(sent)
            }
        }
    }
}

impl From<&ConversionMetadata> for Conversion {
    fn from(metadata: &ConversionMetadata) -> Self {
        Self {
            conversion_id: Some(metadata.conversion_id.clone()),
            campaign_id: Some(metadata.campaign_id.clone()),
            referral_id: Some(metadata.referral_id.clone()),
            owner_address: Some(metadata.owner_address.clone()),
            pending_amount: Some(metadata.pending_amount),
            business_value: Some(metadata.business_value),
            ..Default::default()
        }
    }
}

/// Which unpaid-conversions listing to query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConversionScope {
    /// All unpaid conversions of a merchant
    Merchant(String),
    /// Unpaid conversions of a single campaign
    Campaign(String),
}

impl ConversionScope {
    pub fn id(&self) -> &str {
        match self {
            ConversionScope::Merchant(id) | ConversionScope::Campaign(id) => id,
        }
    }

    /// Endpoint path for this scope.
    pub fn unpaid_path(&self) -> String {
        match self {
            ConversionScope::Merchant(id) => format!(
                "/merchants/offchain/{}/conversions/unpaid",
                urlencoding::encode(id)
            ),
            ConversionScope::Campaign(id) => format!(
                "/campaigns/offchain/{}/conversions/unpaid",
                urlencoding::encode(id)
            ),
        }
    }
}

/// Accepts string or numeric identifiers.
pub(crate) fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

pub(crate) fn opt_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => Ok(Some(s)),
        serde_json::Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}
