//! On-chain settlement: turning backend-issued instruction descriptors into
//! confirmed Solana transactions.

pub mod descriptor;
pub mod error;
pub mod pipeline;
pub mod rpc;

// Re-export commonly used items
pub use descriptor::{AccountKey, InstructionData, InstructionDescriptor};
pub use error::{PipelineStage, TransactionError, TransactionResult};
pub use pipeline::TransactionPipeline;
pub use rpc::{ChainRpc, SimulationOutcome};
#[cfg(feature = "solana-rpc")]
pub use rpc::SolanaRpc;
