//! Merchant REST API client implementation.
//!
//! The [`MerchantApiClient`] provides a typed interface to every backend
//! endpoint the merchant flow uses. Each method is a single request/response
//! round trip; nothing is retried and nothing is cached.
//!
//! # Example
//!
//! ```rust,ignore
//! use affiliate_merchant_sdk::api::MerchantApiClient;
//!
//! let api = MerchantApiClient::new("https://api.example.com")?;
//! let token = api.authenticate(&api_key).await?;
//! let campaigns = api.list_campaigns("merchant-1", &token).await?;
//! ```

use std::str::FromStr;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use solana_pubkey::Pubkey;

use crate::api::error::{ApiError, ApiResult, BackendError};
use crate::api::types::*;
use crate::auth::{AuthResult, AuthToken};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Builder for configuring [`MerchantApiClient`].
#[derive(Debug, Clone)]
pub struct MerchantApiClientBuilder {
    base_url: String,
    timeout: Duration,
    default_headers: Vec<(String, String)>,
}

impl MerchantApiClientBuilder {
    /// Create a new builder with the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_headers: Vec::new(),
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Add a default header to all requests.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Build the client.
    pub fn build(self) -> ApiResult<MerchantApiClient> {
        if self.base_url.is_empty() {
            return Err(ApiError::InvalidParameter("base_url cannot be empty".to_string()));
        }

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        for (name, value) in self.default_headers {
            let header_name = reqwest::header::HeaderName::try_from(name.as_str())
                .map_err(|e| ApiError::InvalidParameter(format!("Invalid header name '{}': {}", name, e)))?;
            let header_value = reqwest::header::HeaderValue::from_str(&value)
                .map_err(|e| ApiError::InvalidParameter(format!("Invalid header value for '{}': {}", name, e)))?;
            headers.insert(header_name, header_value);
        }

        let http_client = Client::builder()
            .timeout(self.timeout)
            .pool_max_idle_per_host(10)
            .default_headers(headers)
            .build()
            .map_err(http_client_error)?;

        Ok(MerchantApiClient {
            http_client,
            base_url: self.base_url,
        })
    }
}

/// Merchant REST API client.
///
/// Every authenticated method takes the [`AuthToken`] explicitly; the client
/// itself holds no session state.
#[derive(Debug, Clone)]
pub struct MerchantApiClient {
    http_client: Client,
    base_url: String,
}

impl MerchantApiClient {
    /// Create a new client with the given base URL (30s timeout).
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        MerchantApiClientBuilder::new(base_url).build()
    }

    /// Create a new client builder for custom configuration.
    pub fn builder(base_url: impl Into<String>) -> MerchantApiClientBuilder {
        MerchantApiClientBuilder::new(base_url)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn http_client(&self) -> &Client {
        &self.http_client
    }

    /// Exchange the merchant API key for a bearer token.
    ///
    /// See [`crate::auth::authenticate`].
    pub async fn authenticate(&self, api_key: &str) -> AuthResult<AuthToken> {
        crate::auth::authenticate(self, api_key).await
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    fn request(&self, method: Method, path: &str, token: &AuthToken) -> RequestBuilder {
        tracing::debug!(method = %method, path = %path, "Backend request");
        self.http_client
            .request(method, self.url(path))
            .bearer_auth(token.as_str())
    }

    /// Send a request; any non-2xx is a [`BackendError`] carrying the
    /// backend's `{error, message}`.
    async fn send_checked(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = read_error_body(response).await;
            let error = BackendError::from_body(status.as_u16(), &body);
            tracing::warn!(status = error.status, error = %error.error, message = %error.message, "Backend rejected request");
            return Err(error.into());
        }
        Ok(response)
    }

    /// Send a request and decode a 2xx JSON body.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        self.send_checked(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Deserialize(format!("Failed to deserialize response: {}", e)))
    }

    // =========================================================================
    // Validation helpers
    // =========================================================================

    fn validate_id(value: &str, field_name: &str) -> ApiResult<()> {
        if value.trim().is_empty() {
            return Err(ApiError::InvalidParameter(format!("{} cannot be empty", field_name)));
        }
        Ok(())
    }

    fn validate_pubkey(value: &str, field_name: &str) -> ApiResult<()> {
        Self::validate_id(value, field_name)?;
        Pubkey::from_str(value)
            .map_err(|_| ApiError::InvalidParameter(format!("{} is not a valid public key", field_name)))?;
        Ok(())
    }

    // =========================================================================
    // Conversion endpoints
    // =========================================================================

    /// Ask the backend for the instruction that registers a conversion on-chain.
    ///
    /// Also returns the campaign/conversion ids the backend assigned.
    pub async fn fetch_conversion_instruction(
        &self,
        referral_id: &str,
        amount: Decimal,
        owner_address: &str,
        token: &AuthToken,
    ) -> ApiResult<ConversionInstructionResponse> {
        Self::validate_id(referral_id, "referral_id")?;
        Self::validate_pubkey(owner_address, "owner_address")?;
        if amount.is_sign_negative() {
            return Err(ApiError::InvalidParameter("amount cannot be negative".to_string()));
        }

        let path = format!(
            "/conversions/onchain/create/{}/{}/{}",
            urlencoding::encode(referral_id),
            urlencoding::encode(owner_address),
            amount.normalize()
        );
        self.send(self.request(Method::GET, &path, token)).await
    }

    /// Replace the off-chain metadata of a conversion.
    ///
    /// Not idempotent by contract: a second call overwrites the first. Once
    /// the backend answers 2xx this succeeds, whatever the body looks like;
    /// see [`Conversion::from_update_response`].
    pub async fn patch_conversion_metadata(
        &self,
        conversion_id: &str,
        metadata: &ConversionMetadata,
        token: &AuthToken,
    ) -> ApiResult<Conversion> {
        Self::validate_id(conversion_id, "conversion_id")?;
        let path = format!("/conversions/offchain/{}", urlencoding::encode(conversion_id));
        let response = self
            .send_checked(self.request(Method::PATCH, &path, token).json(metadata))
            .await?;

        let body = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(%conversion_id, "Failed to read metadata update response: {}", e);
                String::new()
            }
        };
        Ok(Conversion::from_update_response(&body, metadata))
    }

    /// List unpaid conversions of a merchant or a campaign.
    pub async fn list_unpaid_conversions(
        &self,
        scope: &ConversionScope,
        token: &AuthToken,
    ) -> ApiResult<Vec<Conversion>> {
        Self::validate_id(scope.id(), "scope id")?;
        self.send(self.request(Method::GET, &scope.unpaid_path(), token))
            .await
    }

    // =========================================================================
    // Distribution endpoints
    // =========================================================================

    /// Ask the backend for the instruction that pays a referral's reward.
    pub async fn fetch_distribution_instruction(
        &self,
        campaign_id: &str,
        referral_id: &str,
        conversion_id: &str,
        owner_address: &str,
        token: &AuthToken,
    ) -> ApiResult<InstructionDescriptor> {
        Self::validate_id(campaign_id, "campaign_id")?;
        Self::validate_id(referral_id, "referral_id")?;
        Self::validate_id(conversion_id, "conversion_id")?;
        Self::validate_pubkey(owner_address, "owner_address")?;

        let body = DistributionRequest {
            campaign_id: campaign_id.to_string(),
            referral_id: referral_id.to_string(),
            conversion_id: conversion_id.to_string(),
            owner: owner_address.to_string(),
        };
        let response: DistributionInstructionResponse = self
            .send(
                self.request(Method::POST, "/distributions/onchain/create", token)
                    .json(&body),
            )
            .await?;
        Ok(response.instruction)
    }

    // =========================================================================
    // Campaign endpoints
    // =========================================================================

    /// List a merchant's campaigns.
    pub async fn list_campaigns(
        &self,
        merchant_id: &str,
        token: &AuthToken,
    ) -> ApiResult<Vec<Campaign>> {
        Self::validate_id(merchant_id, "merchant_id")?;
        let path = format!(
            "/campaigns/offchain/campaigns/{}",
            urlencoding::encode(merchant_id)
        );
        self.send(self.request(Method::GET, &path, token)).await
    }

    /// Get a single campaign.
    pub async fn fetch_campaign(&self, campaign_id: &str, token: &AuthToken) -> ApiResult<Campaign> {
        Self::validate_id(campaign_id, "campaign_id")?;
        let path = format!("/campaigns/offchain/{}", urlencoding::encode(campaign_id));
        self.send(self.request(Method::GET, &path, token)).await
    }
}

/// Body of a non-2xx response, or empty if it cannot be read.
pub(crate) async fn read_error_body(response: Response) -> String {
    match response.text().await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Failed to read error response body: {}", e);
            String::new()
        }
    }
}

/// The HTTP client could not be constructed from the builder settings.
fn http_client_error(e: reqwest::Error) -> ApiError {
    ApiError::InvalidParameter(format!("Failed to build HTTP client: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_trims_trailing_slash() {
        let client = MerchantApiClient::builder("https://api.example.com/")
            .timeout_secs(5)
            .header("X-Client", "sdk")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "https://api.example.com");
        assert_eq!(client.url("/campaigns/offchain/1"), "https://api.example.com/campaigns/offchain/1");
    }

    #[test]
    fn test_builder_rejects_bad_header() {
        let result = MerchantApiClient::builder("https://api.example.com")
            .header("bad header", "value")
            .build();
        assert!(matches!(result, Err(ApiError::InvalidParameter(_))));
    }

    #[test]
    fn test_builder_rejects_empty_url() {
        assert!(matches!(
            MerchantApiClient::new("/"),
            Err(ApiError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_client_build_failure_is_invalid_parameter() {
        let builder_error = Client::new().get("not a url").build().unwrap_err();
        let err = http_client_error(builder_error);
        assert!(matches!(err, ApiError::InvalidParameter(_)));
        assert!(err.backend().is_none());
        assert!(err.to_string().contains("Failed to build HTTP client"));
    }

    #[test]
    fn test_validate_pubkey() {
        assert!(MerchantApiClient::validate_pubkey(&Pubkey::new_unique().to_string(), "owner").is_ok());
        assert!(MerchantApiClient::validate_pubkey("", "owner").is_err());
        assert!(MerchantApiClient::validate_pubkey("xyz", "owner").is_err());
    }

    #[tokio::test]
    async fn test_invalid_parameters_fail_before_network() {
        // Nothing listens here; a request would surface as ApiError::Network.
        let client = MerchantApiClient::new("http://127.0.0.1:9").unwrap();
        let token = AuthToken::new("t");

        let err = client
            .fetch_conversion_instruction("", Decimal::ONE, &Pubkey::new_unique().to_string(), &token)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameter(_)));

        let err = client
            .fetch_conversion_instruction("REF1", Decimal::NEGATIVE_ONE, &Pubkey::new_unique().to_string(), &token)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameter(_)));

        let err = client
            .fetch_distribution_instruction("c", "r", "v", "not-a-key", &token)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameter(_)));

        let err = client.fetch_campaign(" ", &token).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameter(_)));
    }
}
