//! Configuration module
//!
//! Handles CLI configuration: where the API lives and how to reach it.

use std::time::Duration;

use anyhow::{Context, Result};
use smartsupport_client::{ClientConfig, TicketClient};

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Connection settings for the classification API
    pub client: ClientConfig,
}

impl Config {
    /// Applies command-line overrides on top of `base`
    ///
    /// An empty `api_key` clears the key taken from the environment.
    pub fn new(
        base: ClientConfig,
        api_url: Option<String>,
        api_key: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Self {
        let mut client = base;

        if let Some(api_url) = api_url {
            client.base_url = api_url;
        }
        if let Some(api_key) = api_key {
            client.api_key = Some(api_key).filter(|key| !key.is_empty());
        }
        if let Some(timeout_secs) = timeout_secs {
            client.timeout = Duration::from_secs(timeout_secs);
        }

        Self { client }
    }

    /// Builds the API client
    pub fn client(&self) -> Result<TicketClient> {
        TicketClient::from_config(&self.client).context("Failed to create API client")
    }
}
