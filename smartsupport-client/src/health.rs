//! Health API endpoints

use crate::TicketClient;
use crate::error::Result;
use smartsupport_core::domain::health::{HealthCheckResponse, RootResponse};

impl TicketClient {
    // =============================================================================
    // Service Health
    // =============================================================================

    /// Get the API root (name, version, status)
    pub async fn get_root(&self) -> Result<RootResponse> {
        let url = format!("{}/", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Get the health of the classification service
    ///
    /// A healthy service may still be loading its models; check
    /// `HealthCheckResponse::is_ready` before expecting fast classifications.
    pub async fn get_health(&self) -> Result<HealthCheckResponse> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
