//! # Affiliate Merchant SDK
//!
//! A Rust SDK for merchants settling affiliate conversions on Solana.
//!
//! ## Modules
//!
//! - [`auth`]: API-key authentication, bearer tokens
//! - [`api`]: REST gateway for campaigns, conversions and distributions
//! - [`program`]: instruction descriptors and the build → simulate → sign →
//!   submit → confirm pipeline
//! - [`keypair`]: signing keypair files
//! - [`client`]: `MerchantClient`, composing the above into
//!   `register_conversion` and `distribute_reward`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use affiliate_merchant_sdk::prelude::*;
//! use rust_decimal::Decimal;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = MerchantConfig::from_env()?;
//!     let client = MerchantClient::from_config(&config)?;
//!     let keypair = config.load_keypair()?;
//!
//!     let token = client.authenticate().await?;
//!     let registered = client
//!         .register_conversion("REF1", Decimal::new(1, 1), Decimal::new(4999, 2), &token, &keypair)
//!         .await?;
//!     println!("Conversion registered: {}", registered.signature);
//!
//!     Ok(())
//! }
//! ```

// ============================================================================
// MODULES
// ============================================================================

/// Network and configuration constants.
pub mod network;

/// Unified SDK error types.
pub mod error;

/// Authentication: API key → bearer token.
pub mod auth;

/// REST API client for the merchant backend.
#[cfg(feature = "http")]
pub mod api;

/// On-chain settlement: descriptors, RPC seam, transaction pipeline.
pub mod program;

/// Keypair file loading and generation.
pub mod keypair;

/// `MerchantClient`, the primary entry point.
#[cfg(feature = "http")]
pub mod client;

// ============================================================================
// PRELUDE
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use affiliate_merchant_sdk::prelude::*;
/// ```
pub mod prelude {
    // Errors
    pub use crate::error::{SdkError, SdkResult};

    // Network constants
    pub use crate::network::{DEFAULT_KEYPAIR_PATH, DEFAULT_RPC_URL};

    // Auth
    pub use crate::auth::{AuthError, AuthResult, AuthToken};

    // Program / pipeline
    pub use crate::program::{
        AccountKey, ChainRpc, InstructionData, InstructionDescriptor, PipelineStage,
        SimulationOutcome, TransactionError, TransactionPipeline, TransactionResult,
    };
    #[cfg(feature = "solana-rpc")]
    pub use crate::program::SolanaRpc;

    // Keypair
    pub use crate::keypair::{
        generate_keypair_json, keypair_from_base58, load_default_keypair, load_keypair,
        write_keypair_json, KeypairError, KeypairResult,
    };

    // API
    #[cfg(feature = "http")]
    pub use crate::api::{
        ApiError, ApiResult, BackendError, Campaign, Conversion, ConversionInstructionResponse,
        ConversionMetadata, ConversionScope, ConversionStub, MerchantApiClient,
        MerchantApiClientBuilder,
    };

    // High-level client
    #[cfg(feature = "http")]
    pub use crate::client::{
        DistributedReward, MerchantClient, MerchantClientBuilder, MerchantConfig,
        RegisteredConversion,
    };
}
