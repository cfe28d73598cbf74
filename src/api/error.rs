//! API error types for the merchant REST API client.

use thiserror::Error;

/// Error code used when the backend body carries no machine-readable code.
pub const UNKNOWN_ERROR_CODE: &str = "unknown";

/// API-specific error type for the merchant REST API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Backend answered with a non-2xx status
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Transport failure (DNS, connection refused, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON deserialization error
    #[error("Deserialization error: {0}")]
    Deserialize(String),

    /// Invalid parameter provided
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ApiError {
    /// The backend error, if the request reached the backend and was rejected.
    pub fn backend(&self) -> Option<&BackendError> {
        match self {
            ApiError::Backend(e) => Some(e),
            _ => None,
        }
    }

    /// HTTP status returned by the backend, if any.
    pub fn status(&self) -> Option<u16> {
        self.backend().map(|e| e.status)
    }
}

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// A non-2xx response from the backend.
///
/// Carries the HTTP status plus both fields of the backend's
/// `{ "error": ..., "message": ... }` body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("backend error {status}: {error}: {message}")]
pub struct BackendError {
    /// HTTP status code
    pub status: u16,
    /// Machine-readable error code
    pub error: String,
    /// Human-readable message
    pub message: String,
}

impl BackendError {
    /// Build from a status code and the raw response body.
    ///
    /// Bodies that are not `{error, message}` JSON keep the raw text as the
    /// message under the [`UNKNOWN_ERROR_CODE`] code.
    pub fn from_body(status: u16, body: &str) -> Self {
        let response = serde_json::from_str::<ErrorResponse>(body)
            .ok()
            .filter(|r| r.error.is_some() || r.message.is_some())
            .unwrap_or_else(|| ErrorResponse::from_text(body.trim().to_string()));

        let message = response.message.filter(|m| !m.is_empty()).unwrap_or_else(|| {
            reqwest::StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or("Unknown error")
                .to_string()
        });

        Self {
            status,
            error: response
                .error
                .unwrap_or_else(|| UNKNOWN_ERROR_CODE.to_string()),
            message,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }

    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }
}

/// Error response format from the API.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable error code
    #[serde(default)]
    pub error: Option<String>,
    /// Human-readable error message
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorResponse {
    /// Wrap a non-JSON body.
    pub fn from_text(text: String) -> Self {
        Self {
            error: None,
            message: if text.is_empty() { None } else { Some(text) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_from_json_body() {
        let err = BackendError::from_body(400, r#"{"error":"X","message":"Y"}"#);
        assert_eq!(err.status, 400);
        assert_eq!(err.error, "X");
        assert_eq!(err.message, "Y");

        let rendered = err.to_string();
        assert!(rendered.contains('X'));
        assert!(rendered.contains('Y'));
        assert!(rendered.contains("400"));
    }

    #[test]
    fn test_backend_error_from_plain_text() {
        let err = BackendError::from_body(502, "upstream unavailable\n");
        assert_eq!(err.error, UNKNOWN_ERROR_CODE);
        assert_eq!(err.message, "upstream unavailable");
        assert!(err.is_server_error());
    }

    #[test]
    fn test_backend_error_empty_body_uses_reason() {
        let err = BackendError::from_body(404, "");
        assert_eq!(err.message, "Not Found");
        assert!(err.is_not_found());
        assert!(err.is_client_error());
    }

    #[test]
    fn test_backend_error_missing_message() {
        let err = BackendError::from_body(409, r#"{"error":"ConversionExists"}"#);
        assert_eq!(err.error, "ConversionExists");
        assert_eq!(err.message, "Conflict");
    }

    #[test]
    fn test_api_error_status() {
        let err = ApiError::from(BackendError::from_body(401, r#"{"error":"a","message":"b"}"#));
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "backend error 401: a: b");

        let err = ApiError::InvalidParameter("id".into());
        assert_eq!(err.status(), None);
    }
}
