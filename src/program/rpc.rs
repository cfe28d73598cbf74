//! The RPC seam used by the transaction pipeline.
//!
//! [`ChainRpc`] covers exactly the node calls the pipeline needs. The
//! default implementation, [`SolanaRpc`], wraps the nonblocking Solana
//! `RpcClient` at `confirmed` commitment.

use async_trait::async_trait;
use solana_hash::Hash;
use solana_signature::Signature;
use solana_transaction::Transaction;

use crate::program::error::TransactionResult;

/// Result of a pre-flight simulation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationOutcome {
    /// Execution error reported by the node, if any
    pub err: Option<String>,
    /// Program logs
    pub logs: Vec<String>,
    /// Compute units consumed
    pub units_consumed: Option<u64>,
}

impl SimulationOutcome {
    pub fn is_success(&self) -> bool {
        self.err.is_none()
    }
}

/// Node operations required to build, check and land a transaction.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Current recent blockhash.
    async fn latest_blockhash(&self) -> TransactionResult<Hash>;

    /// Simulate without committing. Signatures are not verified.
    async fn simulate(&self, transaction: &Transaction) -> TransactionResult<SimulationOutcome>;

    /// Submit a signed transaction and wait for `confirmed` commitment.
    async fn send_and_confirm(&self, transaction: &Transaction) -> TransactionResult<Signature>;
}

#[cfg(feature = "solana-rpc")]
pub use solana::SolanaRpc;

#[cfg(feature = "solana-rpc")]
mod solana {
    use super::*;

    use solana_client::nonblocking::rpc_client::RpcClient;
    use solana_client::rpc_config::RpcSimulateTransactionConfig;
    use solana_commitment_config::CommitmentConfig;

    use crate::program::error::TransactionError;

    /// [`ChainRpc`] backed by a Solana JSON-RPC node.
    pub struct SolanaRpc {
        rpc_client: RpcClient,
    }

    impl SolanaRpc {
        /// Connect at `confirmed` commitment.
        pub fn new(rpc_url: &str) -> Self {
            Self {
                rpc_client: RpcClient::new_with_commitment(
                    rpc_url.to_string(),
                    CommitmentConfig::confirmed(),
                ),
            }
        }

        /// Wrap an existing client. Its commitment is used for confirmation.
        pub fn from_rpc_client(rpc_client: RpcClient) -> Self {
            Self { rpc_client }
        }

        pub fn url(&self) -> String {
            self.rpc_client.url()
        }

        /// Access the underlying RPC client.
        pub fn rpc_client(&self) -> &RpcClient {
            &self.rpc_client
        }
    }

    #[async_trait]
    impl ChainRpc for SolanaRpc {
        async fn latest_blockhash(&self) -> TransactionResult<Hash> {
            self.rpc_client
                .get_latest_blockhash()
                .await
                .map_err(|e| TransactionError::Blockhash(e.to_string()))
        }

        async fn simulate(&self, transaction: &Transaction) -> TransactionResult<SimulationOutcome> {
            let config = RpcSimulateTransactionConfig {
                sig_verify: false,
                replace_recent_blockhash: false,
                commitment: Some(self.rpc_client.commitment()),
                ..Default::default()
            };

            let result = self
                .rpc_client
                .simulate_transaction_with_config(transaction, config)
                .await
                .map_err(|e| TransactionError::Rpc(e.to_string()))?
                .value;

            Ok(SimulationOutcome {
                err: result.err.map(|e| format!("{:?}", e)),
                logs: result.logs.unwrap_or_default(),
                units_consumed: result.units_consumed,
            })
        }

        async fn send_and_confirm(&self, transaction: &Transaction) -> TransactionResult<Signature> {
            self.rpc_client
                .send_and_confirm_transaction(transaction)
                .await
                .map_err(|e| TransactionError::Submission(e.to_string()))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_solana_rpc_creation() {
            let rpc = SolanaRpc::new(crate::network::DEFAULT_RPC_URL);
            assert_eq!(rpc.url(), crate::network::DEFAULT_RPC_URL);
            assert_eq!(rpc.rpc_client().commitment(), CommitmentConfig::confirmed());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_outcome_success() {
        assert!(SimulationOutcome::default().is_success());

        let failed = SimulationOutcome {
            err: Some("AccountInUse".to_string()),
            ..Default::default()
        };
        assert!(!failed.is_success());
    }
}
