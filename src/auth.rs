//! Authentication module for the merchant backend.
//!
//! Exchanges a static merchant API key for a short-lived bearer token.
//!
//! # Authentication Flow
//!
//! 1. `GET /merchants/authenticate` with the `X-API-Key` header
//! 2. Extract `token` from the JSON response
//! 3. Pass the [`AuthToken`] to every subsequent gateway call
//!
//! Tokens are not cached or refreshed here: every call to [`authenticate`]
//! is a fresh round trip, and re-authenticating after expiry is up to the
//! caller.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Header carrying the merchant API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Authentication-specific errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// The backend rejected the API key
    #[error("Authentication failed ({status}): {error}: {message}")]
    Rejected {
        status: u16,
        error: String,
        message: String,
    },

    /// HTTP request failed before a response was received
    #[cfg(feature = "http")]
    #[error("HTTP request error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response could not be understood
    #[error("Invalid authentication response: {0}")]
    InvalidResponse(String),

    /// The API key cannot be sent as a header value
    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),
}

/// Result type alias for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Opaque bearer credential issued by the backend.
///
/// `Debug` output is redacted so tokens do not leak into logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AuthToken").field(&"<redacted>").finish()
    }
}

impl From<String> for AuthToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AuthToken {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ============================================================================
// Feature-gated authentication (requires network)
// ============================================================================

#[cfg(feature = "http")]
mod login {
    use super::*;
    use crate::api::client::{read_error_body, MerchantApiClient};
    use crate::api::error::BackendError;

    /// Response from the authenticate endpoint
    #[derive(Debug, Deserialize)]
    struct AuthenticateResponse {
        token: String,
    }

    /// Authenticate with the backend and obtain a bearer token.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use affiliate_merchant_sdk::api::MerchantApiClient;
    /// use affiliate_merchant_sdk::auth::authenticate;
    ///
    /// let api = MerchantApiClient::new("https://api.example.com")?;
    /// let token = authenticate(&api, &api_key).await?;
    /// ```
    pub async fn authenticate(api: &MerchantApiClient, api_key: &str) -> AuthResult<AuthToken> {
        let header_value = reqwest::header::HeaderValue::from_str(api_key)
            .map_err(|e| AuthError::InvalidApiKey(e.to_string()))?;

        let url = api.url("/merchants/authenticate");
        tracing::debug!(url = %url, "Authenticating merchant");

        let response = api
            .http_client()
            .get(&url)
            .header(API_KEY_HEADER, header_value)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = read_error_body(response).await;
            let rejected = BackendError::from_body(status.as_u16(), &body);
            tracing::warn!(status = rejected.status, error = %rejected.error, "Authentication rejected");
            return Err(AuthError::Rejected {
                status: rejected.status,
                error: rejected.error,
                message: rejected.message,
            });
        }

        let body: AuthenticateResponse = response.json().await.map_err(|e| {
            AuthError::InvalidResponse(format!("Failed to parse response: {}", e))
        })?;

        if body.token.is_empty() {
            return Err(AuthError::InvalidResponse("empty token".to_string()));
        }

        Ok(AuthToken(body.token))
    }
}

#[cfg(feature = "http")]
pub use login::authenticate;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_debug_is_redacted() {
        let token = AuthToken::new("secret-jwt");
        let rendered = format!("{:?}", token);
        assert!(!rendered.contains("secret-jwt"));
        assert!(rendered.contains("redacted"));
    }

    #[test]
    fn test_token_bearer() {
        let token = AuthToken::from("abc");
        assert_eq!(token.bearer(), "Bearer abc");
        assert_eq!(token.as_str(), "abc");
        assert!(!token.is_empty());
    }

    #[test]
    fn test_token_serde_transparent() {
        let token: AuthToken = serde_json::from_str(r#""abc""#).unwrap();
        assert_eq!(token, AuthToken::new("abc"));
        assert_eq!(serde_json::to_string(&token).unwrap(), r#""abc""#);
    }

    #[test]
    fn test_rejected_message_carries_code_and_message() {
        let err = AuthError::Rejected {
            status: 401,
            error: "InvalidApiKey".to_string(),
            message: "API key not recognised".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("InvalidApiKey"));
        assert!(rendered.contains("API key not recognised"));
    }
}
