//! Server-issued instruction descriptors and their mapping to native instructions.
//!
//! The backend describes every on-chain instruction as JSON:
//!
//! ```text
//! {
//!   "programId": "<base58>",
//!   "keys": [{ "pubkey": "<base58>", "isSigner": true, "isWritable": true }, ...],
//!   "data": [1, 2, 3]            // or {"type":"Buffer","data":[...]} or "<base64>"
//! }
//! ```
//!
//! The schema is fixed by the backend; this module only adapts it into
//! [`solana_instruction::Instruction`].

use std::str::FromStr;

use base64::Engine;
use serde::{Deserialize, Serialize};
use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;

use crate::program::error::{TransactionError, TransactionResult};

/// One account reference of an instruction descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountKey {
    /// Account address (Base58)
    pub pubkey: String,
    #[serde(default)]
    pub is_signer: bool,
    #[serde(default)]
    pub is_writable: bool,
}

/// Opaque instruction payload in any of the encodings the backend emits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InstructionData {
    /// Plain JSON byte array
    Bytes(Vec<u8>),
    /// Node.js `Buffer` serialization: `{"type":"Buffer","data":[...]}`
    Buffer {
        #[serde(rename = "type")]
        kind: String,
        data: Vec<u8>,
    },
    /// Base64 string
    Base64(String),
}

impl Default for InstructionData {
    fn default() -> Self {
        InstructionData::Bytes(Vec::new())
    }
}

impl InstructionData {
    /// Decode into raw bytes.
    pub fn to_bytes(&self) -> TransactionResult<Vec<u8>> {
        match self {
            InstructionData::Bytes(bytes) => Ok(bytes.clone()),
            InstructionData::Buffer { data, .. } => Ok(data.clone()),
            InstructionData::Base64(encoded) => base64::engine::general_purpose::STANDARD
                .decode(encoded)
                .map_err(|e| {
                    TransactionError::InvalidInstruction(format!("data is not valid base64: {}", e))
                }),
        }
    }
}

/// A server-issued description of a single on-chain instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionDescriptor {
    /// Program to invoke (Base58)
    pub program_id: String,
    /// Ordered account references
    pub keys: Vec<AccountKey>,
    /// Instruction payload
    #[serde(default)]
    pub data: InstructionData,
}

impl InstructionDescriptor {
    /// Map into a native instruction, resolving every address.
    pub fn to_instruction(&self) -> TransactionResult<Instruction> {
        let program_id = parse_pubkey(&self.program_id, "programId")?;

        let accounts = self
            .keys
            .iter()
            .enumerate()
            .map(|(i, key)| {
                let pubkey = parse_pubkey(&key.pubkey, &format!("keys[{}]", i))?;
                Ok(if key.is_writable {
                    AccountMeta::new(pubkey, key.is_signer)
                } else {
                    AccountMeta::new_readonly(pubkey, key.is_signer)
                })
            })
            .collect::<TransactionResult<Vec<_>>>()?;

        Ok(Instruction {
            program_id,
            accounts,
            data: self.data.to_bytes()?,
        })
    }

    /// Addresses the descriptor marks as signers.
    pub fn signer_keys(&self) -> impl Iterator<Item = &str> {
        self.keys
            .iter()
            .filter(|k| k.is_signer)
            .map(|k| k.pubkey.as_str())
    }
}

fn parse_pubkey(value: &str, field: &str) -> TransactionResult<Pubkey> {
    Pubkey::from_str(value).map_err(|e| {
        TransactionError::InvalidInstruction(format!("{} is not a valid pubkey ({}): {}", field, value, e))
    })
}
