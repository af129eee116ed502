//! Client configuration
//!
//! Connection settings for the classification API.

use std::time::Duration;

use crate::error::{ClientError, Result};

/// Default API location for local development
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Default per-request timeout; classification requests can be slow
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g., "http://localhost:8000")
    pub base_url: String,

    /// Sent as the `X-API-Key` header when set
    pub api_key: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Creates a configuration with defaults
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables, all optional:
    /// - SMARTSUPPORT_API_URL (default: http://localhost:8000)
    /// - SMARTSUPPORT_API_KEY
    /// - SMARTSUPPORT_TIMEOUT_SECS (default: 30)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading variables through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("SMARTSUPPORT_API_URL")
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let api_key = lookup("SMARTSUPPORT_API_KEY").filter(|key| !key.is_empty());

        let timeout = lookup("SMARTSUPPORT_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);

        Self {
            base_url,
            api_key,
            timeout,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(ClientError::Config("base_url cannot be empty".to_string()));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ClientError::Config(
                "base_url must start with http:// or https://".to_string(),
            ));
        }

        if self.timeout.is_zero() {
            return Err(ClientError::Config(
                "timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}
