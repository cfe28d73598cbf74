//! Write a keypair JSON file from a Base58 secret key.
//!
//! Run: cargo run --example generate_keypair -- <secret_base58> <expected_pubkey> [output_path]

use std::env;

use affiliate_merchant_sdk::keypair::generate_keypair_json;
use affiliate_merchant_sdk::network::DEFAULT_KEYPAIR_PATH;
use solana_signer::Signer;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    let (Some(secret), Some(expected)) = (args.first(), args.get(1)) else {
        eprintln!("usage: generate_keypair <secret_base58> <expected_pubkey> [output_path]");
        std::process::exit(2);
    };
    let path = args.get(2).map(String::as_str).unwrap_or(DEFAULT_KEYPAIR_PATH);

    let keypair = generate_keypair_json(secret, expected, path)?;
    println!("Keypair for {} written to {}", keypair.pubkey(), path);

    Ok(())
}
