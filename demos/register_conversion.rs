//! Register a conversion on-chain and attach its business value.
//!
//! Run: cargo run --example register_conversion --features native -- <referral_id> <amount> <business_value>

use std::env;
use std::str::FromStr;

use affiliate_merchant_sdk::prelude::*;
use rust_decimal::Decimal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().skip(1).collect();
    let referral_id = args.first().map(String::as_str).unwrap_or("REF1");
    let amount = Decimal::from_str(args.get(1).map(String::as_str).unwrap_or("0.1"))?;
    let business_value = Decimal::from_str(args.get(2).map(String::as_str).unwrap_or("49.99"))?;

    let config = MerchantConfig::from_env()?;
    let client = MerchantClient::from_config(&config)?;
    let keypair = config.load_keypair()?;

    let token = client.authenticate().await?;

    match client
        .register_conversion(referral_id, amount, business_value, &token, &keypair)
        .await
    {
        Ok(registered) => {
            println!("Conversion registered");
            println!("  Signature:     {}", registered.signature);
            println!("  Conversion id: {}", registered.metadata.conversion_id);
        }
        Err(SdkError::PartialRegistration { signature, metadata, source }) => {
            println!("On-chain registration landed ({}) but metadata update failed: {}", signature, source);
            println!("Retrying metadata update for {}...", metadata.conversion_id);
            let stored = client.retry_metadata_update(&metadata, &token).await?;
            println!("  Stored: {:?}", stored.status);
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
