//! SmartSupport HTTP Client
//!
//! A type-safe HTTP client for the SmartSupport ticket classification API.
//!
//! Submitting a ticket only returns a task id; the classification result is
//! fetched later from the status endpoint. `TicketClient` implements
//! `StatusSource`, so it can be handed straight to the task poller.
//!
//! # Example
//!
//! ```no_run
//! use smartsupport_client::TicketClient;
//! use smartsupport_core::dto::ticket::TicketInput;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = TicketClient::new("http://localhost:8000");
//!
//!     let task = client.create_ticket(TicketInput::new("I want a refund")).await?;
//!
//!     println!("Submitted ticket, task {}", task.task_id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
mod dashboard;
mod health;
mod source;
mod tickets;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{ClientError, Result};

use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Header carrying the API key (`X-API-Key`)
pub const API_KEY_HEADER: &str = "x-api-key";

/// HTTP client for the SmartSupport API
///
/// Endpoints are organized into logical groups:
/// - Tickets (submit, status)
/// - Health (root, health)
/// - Dashboard (stats, history)
#[derive(Debug, Clone)]
pub struct TicketClient {
    /// Base URL of the API (e.g., "http://localhost:8000")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl TicketClient {
    /// Create a new client with default HTTP settings
    ///
    /// # Example
    /// ```
    /// use smartsupport_client::TicketClient;
    ///
    /// let client = TicketClient::new("http://localhost:8000");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Create a client from a validated configuration
    ///
    /// Applies the request timeout and sends the API key, when configured,
    /// with every request.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        match &config.api_key {
            Some(key) => {
                let mut value = HeaderValue::from_str(key)
                    .map_err(|e| ClientError::Config(format!("Invalid API key: {}", e)))?;
                value.set_sensitive(true);
                headers.insert(HeaderName::from_static(API_KEY_HEADER), value);
            }
            None => debug!("No API key configured, requests may be rejected"),
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self::with_client(config.base_url.clone(), client))
    }

    /// Get the base URL of the API
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Checks the status code and returns an appropriate error if the request
    /// failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            debug!("API error {}: {}", status, error_text);
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
