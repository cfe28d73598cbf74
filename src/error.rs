//! Unified SDK error types.

use thiserror::Error;

use crate::auth::AuthError;
use crate::keypair::KeypairError;
use crate::program::error::TransactionError;

#[cfg(feature = "http")]
use crate::api::error::{ApiError, BackendError};

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[cfg(feature = "http")]
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] TransactionError),

    #[error("Keypair error: {0}")]
    Keypair(#[from] KeypairError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// The conversion exists on-chain but its off-chain metadata was not
    /// stored. Retry only the metadata update with `metadata`.
    #[cfg(feature = "http")]
    #[error(
        "Conversion {} registered on-chain ({signature}) but metadata update failed: {source}",
        .metadata.conversion_id
    )]
    PartialRegistration {
        signature: solana_signature::Signature,
        metadata: crate::api::types::ConversionMetadata,
        #[source]
        source: ApiError,
    },
}

impl SdkError {
    /// The backend rejection behind this error, if any.
    #[cfg(feature = "http")]
    pub fn backend(&self) -> Option<&BackendError> {
        match self {
            SdkError::Api(e) => e.backend(),
            SdkError::PartialRegistration { source, .. } => source.backend(),
            _ => None,
        }
    }

    /// Whether an on-chain transaction from this operation may already exist.
    pub fn may_have_landed(&self) -> bool {
        match self {
            SdkError::Transaction(e) => e.may_have_landed(),
            #[cfg(feature = "http")]
            SdkError::PartialRegistration { .. } => true,
            _ => false,
        }
    }
}

/// Result type alias for SDK operations.
pub type SdkResult<T> = Result<T, SdkError>;
