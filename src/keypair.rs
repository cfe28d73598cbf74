//! Merchant signing keypair loading and generation.
//!
//! Keypair files use the Solana CLI format: a JSON array of the 64 raw
//! secret-key bytes.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use solana_keypair::Keypair;
use solana_pubkey::Pubkey;
use solana_signer::Signer;
use thiserror::Error;

use crate::network::DEFAULT_KEYPAIR_PATH;

/// Keypair loading / generation errors
#[derive(Debug, Error)]
pub enum KeypairError {
    /// File could not be read or written
    #[error("Keypair file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File contents are not a valid secret-key byte array
    #[error("Malformed keypair: {0}")]
    Malformed(String),

    /// Base58 secret could not be decoded into a keypair
    #[error("Invalid secret key: {0}")]
    InvalidSecret(String),

    /// Expected public key is not valid Base58
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// The secret does not belong to the expected public key
    #[error("Public key mismatch: expected {expected}, derived {derived}")]
    PublicKeyMismatch { expected: Pubkey, derived: Pubkey },
}

/// Result type alias for keypair operations
pub type KeypairResult<T> = Result<T, KeypairError>;

/// Load a keypair from a JSON byte-array file.
pub fn load_keypair(path: impl AsRef<Path>) -> KeypairResult<Keypair> {
    let path = path.as_ref();
    let data = fs::read_to_string(path).map_err(|source| KeypairError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let bytes: Vec<u8> = serde_json::from_str(&data)
        .map_err(|e| KeypairError::Malformed(format!("{}: {}", path.display(), e)))?;
    Keypair::try_from(bytes.as_slice())
        .map_err(|e| KeypairError::Malformed(format!("{}: {}", path.display(), e)))
}

/// Load the keypair at [`DEFAULT_KEYPAIR_PATH`].
pub fn load_default_keypair() -> KeypairResult<Keypair> {
    load_keypair(DEFAULT_KEYPAIR_PATH)
}

/// Decode a Base58 secret (64-byte keypair or 32-byte seed).
pub fn keypair_from_base58(secret: &str) -> KeypairResult<Keypair> {
    let bytes = bs58::decode(secret.trim())
        .into_vec()
        .map_err(|e| KeypairError::InvalidSecret(e.to_string()))?;

    match bytes.len() {
        64 => Keypair::try_from(bytes.as_slice())
            .map_err(|e| KeypairError::InvalidSecret(e.to_string())),
        32 => {
            let mut seed = [0u8; 32];
            seed.copy_from_slice(&bytes);
            Ok(Keypair::new_from_array(seed))
        }
        n => Err(KeypairError::InvalidSecret(format!(
            "expected 64 or 32 bytes, got {}",
            n
        ))),
    }
}

/// Write `keypair` as a JSON byte array.
pub fn write_keypair_json(keypair: &Keypair, path: impl AsRef<Path>) -> KeypairResult<()> {
    let path = path.as_ref();
    let json = serde_json::to_string(&keypair.to_bytes().to_vec())
        .map_err(|e| KeypairError::Malformed(e.to_string()))?;
    fs::write(path, json).map_err(|source| KeypairError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode `secret`, check it derives `expected_pubkey`, then write the
/// keypair file.
///
/// Nothing is written when the derived public key does not match.
pub fn generate_keypair_json(
    secret: &str,
    expected_pubkey: &str,
    path: impl AsRef<Path>,
) -> KeypairResult<Keypair> {
    let expected = Pubkey::from_str(expected_pubkey.trim())
        .map_err(|e| KeypairError::InvalidPublicKey(format!("{}: {}", expected_pubkey, e)))?;
    let keypair = keypair_from_base58(secret)?;

    let derived = keypair.pubkey();
    if derived != expected {
        return Err(KeypairError::PublicKeyMismatch { expected, derived });
    }

    write_keypair_json(&keypair, &path)?;
    tracing::info!(pubkey = %derived, path = %path.as_ref().display(), "Keypair file written");
    Ok(keypair)
}
