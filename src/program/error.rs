//! Error types for the transaction pipeline.

use std::fmt;

use thiserror::Error;

/// Progress of a single `sign_and_submit` invocation.
///
/// Stages only move forward; any stage may end in a [`TransactionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PipelineStage {
    Building,
    Simulated,
    Signed,
    Submitted,
    Confirmed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Building => "building",
            PipelineStage::Simulated => "simulated",
            PipelineStage::Signed => "signed",
            PipelineStage::Submitted => "submitted",
            PipelineStage::Confirmed => "confirmed",
        };
        f.write_str(name)
    }
}

/// Transaction pipeline errors
#[derive(Debug, Error)]
pub enum TransactionError {
    /// The instruction descriptor could not be mapped to a native instruction
    #[error("Invalid instruction: {0}")]
    InvalidInstruction(String),

    /// Fetching the recent blockhash failed
    #[error("Failed to fetch recent blockhash: {0}")]
    Blockhash(String),

    /// The simulation request itself failed (transport or node error)
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Simulation reported an execution error; nothing was submitted
    #[error("Simulation failed: {details}")]
    Simulation { details: String, logs: Vec<String> },

    /// The keypair could not sign the transaction
    #[error("Signing failed: {0}")]
    Signing(String),

    /// The node rejected the transaction or confirmation timed out
    #[error("Submission failed: {0}")]
    Submission(String),

    /// No signature came back from the node
    #[error("Confirmation failed: {0}")]
    Confirmation(String),
}

impl TransactionError {
    /// Last stage reached before the failure.
    pub fn stage(&self) -> PipelineStage {
        match self {
            TransactionError::InvalidInstruction(_)
            | TransactionError::Blockhash(_)
            | TransactionError::Rpc(_)
            | TransactionError::Simulation { .. } => PipelineStage::Building,
            TransactionError::Signing(_) => PipelineStage::Simulated,
            TransactionError::Submission(_) => PipelineStage::Signed,
            TransactionError::Confirmation(_) => PipelineStage::Submitted,
        }
    }

    /// Whether anything may have reached the network as a submitted transaction.
    pub fn may_have_landed(&self) -> bool {
        self.stage() >= PipelineStage::Signed
    }
}

/// Result type alias for pipeline operations
pub type TransactionResult<T> = Result<T, TransactionError>;
