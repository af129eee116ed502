//! Error types for the SmartSupport client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the SmartSupport client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Client configuration is unusable
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// HTTP status of the failed call, if the API answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            Self::RequestFailed(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(status) if (400..500).contains(&status))
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(status) if status >= 500)
    }

    /// Check if retrying the same request unchanged is likely to succeed
    ///
    /// Covers the classification service warming up or being redeployed:
    /// gateway errors, rate limiting, timeouts and refused connections.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ApiError { status, .. } => matches!(status, 429 | 502 | 503 | 504),
            Self::RequestFailed(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || matches!(e.status().map(|s| s.as_u16()), Some(429 | 502 | 503 | 504))
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_errors_are_transient() {
        for status in [502, 503, 504, 429] {
            let err = ClientError::api_error(status, "Service Unavailable");
            assert!(err.is_transient(), "status {status} should be transient");
        }
    }

    #[test]
    fn test_other_errors_are_not_transient() {
        assert!(!ClientError::api_error(500, "boom").is_transient());
        assert!(!ClientError::api_error(404, "no such task").is_transient());
        assert!(!ClientError::api_error(401, "missing api key").is_transient());
        assert!(!ClientError::ParseError("bad json".to_string()).is_transient());
        assert!(!ClientError::InvalidRequest("empty".to_string()).is_transient());
    }

    #[test]
    fn test_status_classes() {
        let not_found = ClientError::api_error(404, "missing");
        assert!(not_found.is_not_found());
        assert!(not_found.is_client_error());
        assert!(!not_found.is_server_error());

        let unavailable = ClientError::api_error(503, "warming up");
        assert!(unavailable.is_server_error());
        assert_eq!(unavailable.status(), Some(503));
        assert_eq!(
            unavailable.to_string(),
            "API error (status 503): warming up"
        );
    }
}
