//! Error types for the mcpilot domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each network seam has its own error enum; none of them escape a
//! query, they are logged and retried or collapsed into a sentinel.

use thiserror::Error;

/// Failures of a single call to the completion endpoint.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures of a single attempt against the capability registry.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("{method} request returned status {status}: {body}")]
    Status {
        method: String,
        status: u16,
        body: String,
    },

    #[error("{method} request timed out")]
    Timeout { method: String },

    #[error("{method} request failed: {reason}")]
    Network { method: String, reason: String },

    #[error("{method} response is not a valid JSON-RPC envelope: {reason}")]
    MalformedBody { method: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        };
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn transport_error_names_method() {
        let err = TransportError::Status {
            method: "tools/list".into(),
            status: 503,
            body: "unavailable".into(),
        };
        let text = err.to_string();
        assert!(text.contains("tools/list"));
        assert!(text.contains("503"));
    }
}
