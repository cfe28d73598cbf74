//! Pay out every unpaid conversion of a campaign.
//!
//! Run: cargo run --example distribute_unpaid --features native -- <campaign_id>

use std::env;

use affiliate_merchant_sdk::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let campaign_id = env::args()
        .nth(1)
        .ok_or("usage: distribute_unpaid <campaign_id>")?;

    let config = MerchantConfig::from_env()?;
    let client = MerchantClient::from_config(&config)?;
    let keypair = config.load_keypair()?;

    let token = client.authenticate().await?;
    let results = client
        .distribute_unpaid_rewards(&ConversionScope::Campaign(campaign_id), &token, &keypair)
        .await?;

    if results.is_empty() {
        println!("No unpaid conversions");
    }
    for (conversion, result) in results {
        let id = conversion.identifier().unwrap_or("?");
        match result {
            Ok(reward) => println!("{}: paid ({})", id, reward.signature),
            Err(e) => println!("{}: failed: {}", id, e),
        }
    }

    Ok(())
}
