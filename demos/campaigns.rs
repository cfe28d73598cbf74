//! List a merchant's campaigns.
//!
//! Run: cargo run --example campaigns --features native -- <merchant_id>

use std::env;

use affiliate_merchant_sdk::prelude::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let merchant_id = env::args()
        .nth(1)
        .ok_or("usage: campaigns <merchant_id>")?;

    let config = MerchantConfig::from_env()?;
    let client = MerchantClient::from_config(&config)?;

    let token = client.authenticate().await?;
    let campaigns = client.list_campaigns(&merchant_id, &token).await?;

    println!("{} campaign(s) for merchant {}", campaigns.len(), merchant_id);
    for campaign in &campaigns {
        println!(
            "  [{}] {} ({})",
            campaign.identifier().unwrap_or("?"),
            campaign.display_name(),
            campaign.status.as_deref().unwrap_or("unknown")
        );
    }

    Ok(())
}
