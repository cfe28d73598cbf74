//! Backend gateway: REST API client for the merchant affiliate backend.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use affiliate_merchant_sdk::api::{ConversionScope, MerchantApiClient};
//!
//! let api = MerchantApiClient::new("https://api.example.com")?;
//! let token = api.authenticate(&api_key).await?;
//!
//! let unpaid = api
//!     .list_unpaid_conversions(&ConversionScope::Merchant("merchant-1".into()), &token)
//!     .await?;
//! println!("{} unpaid conversions", unpaid.len());
//! ```
//!
//! # Error Handling
//!
//! All methods return `ApiResult<T>`. A backend rejection carries the HTTP
//! status and both fields of the backend's `{error, message}` body:
//!
//! ```rust,ignore
//! match api.fetch_campaign("unknown", &token).await {
//!     Ok(campaign) => println!("{}", campaign.display_name()),
//!     Err(ApiError::Backend(e)) if e.is_not_found() => println!("no such campaign"),
//!     Err(ApiError::Network(e)) => println!("transport failure, retry later: {}", e),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```

pub mod client;
pub mod error;
pub mod types;

// Re-export main types for convenience
pub use client::{MerchantApiClient, MerchantApiClientBuilder};
pub use error::{ApiError, ApiResult, BackendError, ErrorResponse};
pub use types::*;
