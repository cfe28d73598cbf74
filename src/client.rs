//! High-level client: `MerchantClient`.
//!
//! Composes the backend gateway and the transaction pipeline into the two
//! compound merchant operations:
//!
//! - [`MerchantClient::register_conversion`]: fetch instruction → sign and
//!   submit → patch off-chain metadata
//! - [`MerchantClient::distribute_reward`]: fetch instruction → sign and
//!   submit
//!
//! Neither operation is transactional. A failed metadata update after a
//! confirmed registration is reported as [`SdkError::PartialRegistration`]
//! with everything needed to retry just the update.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use solana_keypair::Keypair;
use solana_signature::Signature;
use solana_signer::Signer;

use crate::api::types::{
    Campaign, Conversion, ConversionMetadata, ConversionScope, InstructionDescriptor,
};
use crate::api::MerchantApiClient;
use crate::auth::AuthToken;
use crate::error::{SdkError, SdkResult};
use crate::network::{
    DEFAULT_KEYPAIR_PATH, DEFAULT_RPC_URL, ENV_API_KEY, ENV_API_URL, ENV_KEYPAIR_PATH,
    ENV_RPC_URL,
};
use crate::program::{ChainRpc, TransactionPipeline};

/// Outcome of [`MerchantClient::register_conversion`].
#[derive(Debug, Clone)]
pub struct RegisteredConversion {
    pub instruction: InstructionDescriptor,
    pub signature: Signature,
    pub metadata: Conversion,
}

/// Outcome of [`MerchantClient::distribute_reward`].
#[derive(Debug, Clone)]
pub struct DistributedReward {
    pub instruction: InstructionDescriptor,
    pub signature: Signature,
}

/// The primary entry point for the merchant SDK.
///
/// Holds the REST client, the API key and the transaction pipeline. The
/// keypair and the auth token are passed to each call.
#[derive(Clone)]
pub struct MerchantClient {
    api: MerchantApiClient,
    api_key: String,
    pipeline: TransactionPipeline,
}

impl MerchantClient {
    pub fn builder() -> MerchantClientBuilder {
        MerchantClientBuilder::default()
    }

    /// Build from a [`MerchantConfig`].
    pub fn from_config(config: &MerchantConfig) -> SdkResult<Self> {
        Self::builder()
            .base_url(&config.api_url)
            .api_key(&config.api_key)
            .rpc_url(&config.rpc_url)
            .build()
    }

    pub fn api(&self) -> &MerchantApiClient {
        &self.api
    }

    pub fn pipeline(&self) -> &TransactionPipeline {
        &self.pipeline
    }

    // ── Session ──────────────────────────────────────────────────────────

    /// Authenticate with the configured API key. Always a fresh round trip.
    pub async fn authenticate(&self) -> SdkResult<AuthToken> {
        Ok(self.api.authenticate(&self.api_key).await?)
    }

    // ── Queries ──────────────────────────────────────────────────────────

    pub async fn list_campaigns(&self, merchant_id: &str, token: &AuthToken) -> SdkResult<Vec<Campaign>> {
        Ok(self.api.list_campaigns(merchant_id, token).await?)
    }

    pub async fn fetch_campaign(&self, campaign_id: &str, token: &AuthToken) -> SdkResult<Campaign> {
        Ok(self.api.fetch_campaign(campaign_id, token).await?)
    }

    pub async fn list_unpaid_conversions(
        &self,
        scope: &ConversionScope,
        token: &AuthToken,
    ) -> SdkResult<Vec<Conversion>> {
        Ok(self.api.list_unpaid_conversions(scope, token).await?)
    }

    // ── On-chain operations ──────────────────────────────────────────────

    /// Sign and land a single backend-issued instruction.
    pub async fn sign_and_submit(
        &self,
        instruction: &InstructionDescriptor,
        keypair: &Keypair,
    ) -> SdkResult<Signature> {
        Ok(self.pipeline.sign_and_submit(instruction, keypair).await?)
    }

    /// Register a conversion on-chain, then annotate it off-chain with
    /// `business_value`.
    ///
    /// The keypair's public key is the conversion owner.
    pub async fn register_conversion(
        &self,
        referral_id: &str,
        amount: Decimal,
        business_value: Decimal,
        token: &AuthToken,
        keypair: &Keypair,
    ) -> SdkResult<RegisteredConversion> {
        let owner_address = keypair.pubkey().to_string();

        let response = self
            .api
            .fetch_conversion_instruction(referral_id, amount, &owner_address, token)
            .await?;

        let signature = self
            .pipeline
            .sign_and_submit(&response.instruction, keypair)
            .await?;

        let metadata = ConversionMetadata {
            campaign_id: response.metadata.campaign_id,
            conversion_id: response.metadata.conversion_id,
            referral_id: referral_id.to_string(),
            owner_address,
            pending_amount: amount,
            business_value,
        };

        let updated = match self
            .api
            .patch_conversion_metadata(&metadata.conversion_id, &metadata, token)
            .await
        {
            Ok(updated) => updated,
            Err(source) => {
                tracing::warn!(
                    conversion_id = %metadata.conversion_id,
                    %signature,
                    error = %source,
                    "Conversion registered on-chain but metadata update failed"
                );
                return Err(SdkError::PartialRegistration {
                    signature,
                    metadata,
                    source,
                });
            }
        };

        tracing::info!(
            conversion_id = %metadata.conversion_id,
            campaign_id = %metadata.campaign_id,
            %signature,
            "Conversion registered"
        );

        Ok(RegisteredConversion {
            instruction: response.instruction,
            signature,
            metadata: updated,
        })
    }

    /// Retry only the metadata update of a [`SdkError::PartialRegistration`].
    pub async fn retry_metadata_update(
        &self,
        metadata: &ConversionMetadata,
        token: &AuthToken,
    ) -> SdkResult<Conversion> {
        Ok(self
            .api
            .patch_conversion_metadata(&metadata.conversion_id, metadata, token)
            .await?)
    }

    /// Pay the referral's reward for a registered conversion.
    ///
    /// Backend rejections (e.g. unknown or unapproved conversion) come back
    /// unchanged as [`SdkError::Api`].
    pub async fn distribute_reward(
        &self,
        campaign_id: &str,
        referral_id: &str,
        conversion_id: &str,
        token: &AuthToken,
        keypair: &Keypair,
    ) -> SdkResult<DistributedReward> {
        let owner_address = keypair.pubkey().to_string();

        let instruction = self
            .api
            .fetch_distribution_instruction(
                campaign_id,
                referral_id,
                conversion_id,
                &owner_address,
                token,
            )
            .await?;

        let signature = self.pipeline.sign_and_submit(&instruction, keypair).await?;

        tracing::info!(%conversion_id, %campaign_id, %signature, "Reward distributed");

        Ok(DistributedReward {
            instruction,
            signature,
        })
    }

    /// Distribute rewards for every unpaid conversion in `scope`, one at a
    /// time.
    ///
    /// Only a failed listing aborts; each conversion gets its own result.
    pub async fn distribute_unpaid_rewards(
        &self,
        scope: &ConversionScope,
        token: &AuthToken,
        keypair: &Keypair,
    ) -> SdkResult<Vec<(Conversion, SdkResult<DistributedReward>)>> {
        let unpaid = self.api.list_unpaid_conversions(scope, token).await?;
        tracing::debug!(count = unpaid.len(), scope = %scope.id(), "Distributing unpaid rewards");

        let mut results = Vec::with_capacity(unpaid.len());
        for conversion in unpaid {
            let conversion_id = conversion.identifier().unwrap_or_default().to_string();
            let result = match (
                conversion.identifier(),
                conversion.campaign_id.as_deref(),
                conversion.referral_id.as_deref(),
            ) {
                (Some(conversion_id), Some(campaign_id), Some(referral_id)) => {
                    self.distribute_reward(campaign_id, referral_id, conversion_id, token, keypair)
                        .await
                }
                _ => Err(SdkError::Validation(format!(
                    "conversion {:?} lacks conversionId, campaignId or referralId",
                    conversion_id
                ))),
            };
            if let Err(e) = &result {
                tracing::warn!(%conversion_id, error = %e, "Reward distribution failed");
            }
            results.push((conversion, result));
        }
        Ok(results)
    }
}

impl std::fmt::Debug for MerchantClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MerchantClient")
            .field("api", &self.api)
            .field("api_key", &"<redacted>")
            .field("pipeline", &self.pipeline)
            .finish()
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct MerchantClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    rpc_url: String,
    timeout: Duration,
    rpc: Option<Arc<dyn ChainRpc>>,
}

impl Default for MerchantClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            rpc_url: DEFAULT_RPC_URL.to_string(),
            timeout: Duration::from_secs(30),
            rpc: None,
        }
    }
}

impl MerchantClientBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.to_string());
        self
    }

    pub fn api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    pub fn rpc_url(mut self, url: &str) -> Self {
        self.rpc_url = url.to_string();
        self
    }

    /// HTTP timeout for backend calls.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a custom RPC backend instead of connecting to `rpc_url`.
    pub fn rpc(mut self, rpc: Arc<dyn ChainRpc>) -> Self {
        self.rpc = Some(rpc);
        self
    }

    pub fn build(self) -> SdkResult<MerchantClient> {
        let base_url = self
            .base_url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| SdkError::Config("base_url is required".to_string()))?;
        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| SdkError::Config("api_key is required".to_string()))?;

        let api = MerchantApiClient::builder(base_url)
            .timeout(self.timeout)
            .build()?;

        let rpc = match self.rpc {
            Some(rpc) => rpc,
            None => default_rpc(&self.rpc_url)?,
        };

        Ok(MerchantClient {
            api,
            api_key,
            pipeline: TransactionPipeline::new(rpc),
        })
    }
}

#[cfg(feature = "solana-rpc")]
fn default_rpc(rpc_url: &str) -> SdkResult<Arc<dyn ChainRpc>> {
    Ok(Arc::new(crate::program::SolanaRpc::new(rpc_url)))
}

#[cfg(not(feature = "solana-rpc"))]
fn default_rpc(_rpc_url: &str) -> SdkResult<Arc<dyn ChainRpc>> {
    Err(SdkError::Config(
        "no RPC backend: enable the `solana-rpc` feature or call `rpc()`".to_string(),
    ))
}

// ═════════════════════════════════════════════════════════════════════════════
// Configuration
// ═════════════════════════════════════════════════════════════════════════════

/// Connection settings, typically read from the environment.
#[derive(Clone)]
pub struct MerchantConfig {
    pub api_url: String,
    pub api_key: String,
    pub rpc_url: String,
    pub keypair_path: String,
}

impl MerchantConfig {
    /// Read `AFFILIATE_API_URL`, `AFFILIATE_API_KEY`, and optionally
    /// `SOLANA_RPC_URL` / `AFFILIATE_KEYPAIR_PATH`.
    pub fn from_env() -> SdkResult<Self> {
        Ok(Self {
            api_url: required_var(ENV_API_URL)?,
            api_key: required_var(ENV_API_KEY)?,
            rpc_url: env::var(ENV_RPC_URL).unwrap_or_else(|_| DEFAULT_RPC_URL.to_string()),
            keypair_path: env::var(ENV_KEYPAIR_PATH)
                .unwrap_or_else(|_| DEFAULT_KEYPAIR_PATH.to_string()),
        })
    }

    /// Load the signing keypair from `keypair_path`.
    pub fn load_keypair(&self) -> SdkResult<Keypair> {
        Ok(crate::keypair::load_keypair(&self.keypair_path)?)
    }
}

impl std::fmt::Debug for MerchantConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MerchantConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .field("rpc_url", &self.rpc_url)
            .field("keypair_path", &self.keypair_path)
            .finish()
    }
}

fn required_var(name: &str) -> SdkResult<String> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| SdkError::Config(format!("{} is not set", name)))
}
