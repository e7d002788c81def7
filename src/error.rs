use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(feature = "server")]
use actix_web::{HttpResponse, ResponseError, http::StatusCode};

/// JSON error body returned to clients, e.g. `{"error": "No message provided"}`.
#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    InternalServerError(String),
}

impl fmt::Display for ApiError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::InternalServerError(msg) => write!(f, "Internal server error: {}", msg),
        }
    }
}

#[cfg(feature = "server")]
impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        HttpResponse::build(status_code).json(ErrorResponse { error: message })
    }
}

// Helper functions for creating specific error types
impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        ApiError::BadRequest(msg.into())
    }

    pub fn internal_server_error(msg: impl Into<String>) -> Self {
        ApiError::InternalServerError(msg.into())
    }
}

/// Completion-provider failure, classified for the retry policy.
///
/// Rate-limit responses are the only transient failures worth retrying;
/// everything else (network, auth, malformed response) resolves to the
/// fallback reply immediately.
#[derive(Debug, Clone)]
pub enum ProviderError {
    RateLimited(String),
    Fatal(String),
}

impl ProviderError {
    /// Classify a provider error from its rendered message.
    ///
    /// The provider client does not expose a structured HTTP status on its
    /// error type, so this inspects the message for the markers rate-limit
    /// responses carry.
    #[must_use]
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        let lowered = message.to_lowercase();
        if lowered.contains("429") || lowered.contains("rate limit") || lowered.contains("quota") {
            ProviderError::RateLimited(message)
        } else {
            ProviderError::Fatal(message)
        }
    }

    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ProviderError::RateLimited(_))
    }
}

impl fmt::Display for ProviderError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            ProviderError::RateLimited(msg) => write!(f, "Rate limited: {}", msg),
            ProviderError::Fatal(msg) => write!(f, "Provider error: {}", msg),
        }
    }
}

impl From<genai::Error> for ProviderError {
    fn from(err: genai::Error) -> Self {
        Self::classify(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_http_status_marker() {
        let err = ProviderError::classify("request failed: status 429 Too Many Requests");
        assert!(err.is_rate_limited());
    }

    #[test]
    fn test_classify_rate_limit_phrase() {
        let err = ProviderError::classify("Rate limit reached for model, try again in 2s");
        assert!(err.is_rate_limited());
    }

    #[test]
    fn test_classify_quota_phrase() {
        let err = ProviderError::classify("monthly quota exceeded");
        assert!(err.is_rate_limited());
    }

    #[test]
    fn test_classify_fatal() {
        let err = ProviderError::classify("invalid api key");
        assert!(!err.is_rate_limited());
        assert!(matches!(err, ProviderError::Fatal(_)));
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::bad_request("No message provided");
        assert_eq!(err.to_string(), "Bad request: No message provided");
    }
}
