//! Network and configuration constants for the affiliate merchant SDK.

/// Default Solana RPC endpoint (devnet).
pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";

/// Default location of the merchant signing keypair.
pub const DEFAULT_KEYPAIR_PATH: &str = "./keypair.json";

/// Environment variable holding the backend REST base URL.
pub const ENV_API_URL: &str = "AFFILIATE_API_URL";

/// Environment variable holding the merchant API key.
pub const ENV_API_KEY: &str = "AFFILIATE_API_KEY";

/// Environment variable overriding [`DEFAULT_RPC_URL`].
pub const ENV_RPC_URL: &str = "SOLANA_RPC_URL";

/// Environment variable overriding [`DEFAULT_KEYPAIR_PATH`].
pub const ENV_KEYPAIR_PATH: &str = "AFFILIATE_KEYPAIR_PATH";
