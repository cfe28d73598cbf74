//! Exchange the merchant API key for a bearer token.
//!
//! Run: cargo run --example authenticate --features native

use affiliate_merchant_sdk::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = MerchantConfig::from_env()?;
    let client = MerchantClient::from_config(&config)?;

    let token = client.authenticate().await?;
    println!("Authenticated against {}", config.api_url);
    println!("Token length: {}", token.as_str().len());

    Ok(())
}
