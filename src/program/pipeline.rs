//! Build → simulate → sign → submit → confirm.
//!
//! [`TransactionPipeline::sign_and_submit`] turns one backend-issued
//! [`InstructionDescriptor`] into a confirmed transaction signature. Every
//! invocation is a single attempt: on any failure the caller must fetch a
//! fresh descriptor before trying again, since the blockhash and the
//! on-chain state the simulation ran against may have moved on.

use std::sync::Arc;

use solana_keypair::Keypair;
use solana_signature::Signature;
use solana_signer::Signer;
use solana_transaction::Transaction;

use crate::program::descriptor::InstructionDescriptor;
use crate::program::error::{PipelineStage, TransactionError, TransactionResult};
use crate::program::rpc::ChainRpc;

/// Signs and lands backend-issued instructions.
#[derive(Clone)]
pub struct TransactionPipeline {
    rpc: Arc<dyn ChainRpc>,
}

impl TransactionPipeline {
    pub fn new(rpc: Arc<dyn ChainRpc>) -> Self {
        Self { rpc }
    }

    /// Connect to a Solana RPC endpoint at `confirmed` commitment.
    #[cfg(feature = "solana-rpc")]
    pub fn from_rpc_url(rpc_url: &str) -> Self {
        Self::new(Arc::new(crate::program::rpc::SolanaRpc::new(rpc_url)))
    }

    pub fn rpc(&self) -> &Arc<dyn ChainRpc> {
        &self.rpc
    }

    /// Build the unsigned transaction: one instruction, fee payer `payer`,
    /// recent blockhash attached.
    pub fn build_transaction(
        descriptor: &InstructionDescriptor,
        payer: &solana_pubkey::Pubkey,
        recent_blockhash: solana_hash::Hash,
    ) -> TransactionResult<Transaction> {
        let instruction = descriptor.to_instruction()?;
        let mut transaction = Transaction::new_with_payer(&[instruction], Some(payer));
        transaction.message.recent_blockhash = recent_blockhash;
        Ok(transaction)
    }

    /// Simulate, sign with `keypair`, submit and wait for confirmation.
    ///
    /// The keypair is both fee payer and sole signer. If simulation reports
    /// an execution error the transaction is never signed or submitted.
    pub async fn sign_and_submit(
        &self,
        descriptor: &InstructionDescriptor,
        keypair: &Keypair,
    ) -> TransactionResult<Signature> {
        let payer = keypair.pubkey();
        let mut stage = PipelineStage::Building;
        tracing::debug!(%stage, program_id = %descriptor.program_id, payer = %payer, "Building transaction");

        let recent_blockhash = self.rpc.latest_blockhash().await?;
        let mut transaction = Self::build_transaction(descriptor, &payer, recent_blockhash)?;

        let simulation = self.rpc.simulate(&transaction).await?;
        if let Some(details) = simulation.err {
            tracing::warn!(
                error = %details,
                logs = simulation.logs.len(),
                "Simulation rejected transaction, not submitting"
            );
            return Err(TransactionError::Simulation {
                details,
                logs: simulation.logs,
            });
        }
        stage = PipelineStage::Simulated;
        tracing::debug!(%stage, units_consumed = ?simulation.units_consumed, "Simulation succeeded");

        transaction
            .try_sign(&[keypair], recent_blockhash)
            .map_err(|e| TransactionError::Signing(e.to_string()))?;
        stage = PipelineStage::Signed;
        tracing::debug!(%stage, "Transaction signed");

        let signature = self.rpc.send_and_confirm(&transaction).await?;
        stage = PipelineStage::Submitted;
        tracing::debug!(%stage, "Transaction submitted");

        if signature == Signature::default() {
            return Err(TransactionError::Confirmation(
                "node returned no signature".to_string(),
            ));
        }
        stage = PipelineStage::Confirmed;
        tracing::info!(%stage, %signature, "Transaction confirmed");

        Ok(signature)
    }
}

impl std::fmt::Debug for TransactionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionPipeline").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::descriptor::{AccountKey, InstructionData};
    use solana_hash::Hash;
    use solana_pubkey::Pubkey;

    fn descriptor_for(signer: &Pubkey) -> InstructionDescriptor {
        InstructionDescriptor {
            program_id: Pubkey::new_unique().to_string(),
            keys: vec![
                AccountKey {
                    pubkey: signer.to_string(),
                    is_signer: true,
                    is_writable: true,
                },
                AccountKey {
                    pubkey: Pubkey::new_unique().to_string(),
                    is_signer: false,
                    is_writable: true,
                },
            ],
            data: InstructionData::Bytes(vec![7, 7]),
        }
    }

    #[test]
    fn test_build_transaction_sets_payer_and_blockhash() {
        let payer = Keypair::new();
        let blockhash = Hash::new_from_array([9u8; 32]);
        let tx = TransactionPipeline::build_transaction(
            &descriptor_for(&payer.pubkey()),
            &payer.pubkey(),
            blockhash,
        )
        .unwrap();

        assert_eq!(tx.message.instructions.len(), 1);
        assert_eq!(tx.message.account_keys[0], payer.pubkey());
        assert_eq!(tx.message.recent_blockhash, blockhash);
        assert_eq!(tx.message.header.num_required_signatures, 1);
        assert!(tx.signatures.iter().all(|s| *s == Signature::default()));
    }

    #[test]
    fn test_build_transaction_rejects_invalid_descriptor() {
        let payer = Keypair::new();
        let descriptor = InstructionDescriptor {
            program_id: "bogus".to_string(),
            keys: vec![],
            data: InstructionData::default(),
        };
        let err = TransactionPipeline::build_transaction(&descriptor, &payer.pubkey(), Hash::default())
            .unwrap_err();
        assert_eq!(err.stage(), PipelineStage::Building);
    }

    struct UnreachableRpc;

    #[async_trait::async_trait]
    impl ChainRpc for UnreachableRpc {
        async fn latest_blockhash(&self) -> TransactionResult<Hash> {
            Err(TransactionError::Blockhash("connection refused".to_string()))
        }

        async fn simulate(
            &self,
            _transaction: &Transaction,
        ) -> TransactionResult<crate::program::rpc::SimulationOutcome> {
            panic!("simulate must not run without a blockhash")
        }

        async fn send_and_confirm(&self, _transaction: &Transaction) -> TransactionResult<Signature> {
            panic!("send_and_confirm must not run without a blockhash")
        }
    }

    #[test]
    fn test_blockhash_failure_stops_pipeline() {
        let pipeline = TransactionPipeline::new(Arc::new(UnreachableRpc));
        let keypair = Keypair::new();
        let descriptor = descriptor_for(&keypair.pubkey());

        let err = tokio_test::block_on(pipeline.sign_and_submit(&descriptor, &keypair)).unwrap_err();
        assert!(matches!(err, TransactionError::Blockhash(_)));
        assert!(!err.may_have_landed());
    }
}
