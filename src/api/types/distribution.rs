//! Reward distribution types for the merchant REST API.

use serde::{Deserialize, Serialize};

use crate::program::InstructionDescriptor;

/// Body of `POST /distributions/onchain/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionRequest {
    pub campaign_id: String,
    pub referral_id: String,
    pub conversion_id: String,
    /// Merchant wallet signing the distribution (Base58)
    pub owner: String,
}

/// Response from `POST /distributions/onchain/create`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionInstructionResponse {
    pub instruction: InstructionDescriptor,
}
