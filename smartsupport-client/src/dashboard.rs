//! Dashboard API endpoints

use crate::TicketClient;
use crate::error::{ClientError, Result};
use smartsupport_core::domain::dashboard::{DashboardStats, TicketHistoryItem};

impl TicketClient {
    // =============================================================================
    // Dashboard
    // =============================================================================

    /// Fetch aggregated dashboard statistics
    pub async fn fetch_dashboard_stats(&self) -> Result<DashboardStats> {
        let url = format!("{}/api/v1/stats", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// Fetch a page of previously classified tickets
    ///
    /// # Arguments
    /// * `page` - 1-based page number
    /// * `page_size` - Number of tickets per page
    pub async fn fetch_ticket_history(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<TicketHistoryItem>> {
        if page == 0 || page_size == 0 {
            return Err(ClientError::InvalidRequest(
                "page and page_size must be greater than 0".to_string(),
            ));
        }

        let url = format!("{}/api/v1/history", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("page", page), ("page_size", page_size)])
            .send()
            .await?;

        self.handle_response(response).await
    }
}
