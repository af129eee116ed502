//! Ticket API endpoints

use crate::TicketClient;
use crate::error::{ClientError, Result};
use smartsupport_core::domain::analysis::AnalysisResult;
use smartsupport_core::domain::task::{JobId, TaskStatusResponse};
use smartsupport_core::dto::ticket::{TaskResponse, TicketInput};
use reqwest::Url;
use tracing::debug;

impl TicketClient {
    // =============================================================================
    // Ticket Classification
    // =============================================================================

    /// Submit a ticket for classification
    ///
    /// The API queues the classification and answers immediately with the
    /// task id to poll.
    ///
    /// # Arguments
    /// * `input` - The ticket text
    ///
    /// # Example
    /// ```no_run
    /// # use smartsupport_client::TicketClient;
    /// # use smartsupport_core::dto::ticket::TicketInput;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = TicketClient::new("http://localhost:8000");
    /// let task = client.create_ticket(TicketInput::new("Where is my parcel?")).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_ticket(&self, input: TicketInput) -> Result<TaskResponse> {
        if input.text.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "ticket text cannot be empty".to_string(),
            ));
        }

        let url = format!("{}/api/v1/tickets", self.base_url);
        let response = self.client.post(&url).json(&input).send().await?;

        let task: TaskResponse = self.handle_response(response).await?;
        debug!("Ticket accepted as task {} ({})", task.task_id, task.status);

        Ok(task)
    }

    /// Get the current status of a classification task
    ///
    /// # Arguments
    /// * `task_id` - The id returned by `create_ticket`
    pub async fn get_ticket_status(
        &self,
        task_id: &JobId,
    ) -> Result<TaskStatusResponse<AnalysisResult>> {
        let url = self.status_url(task_id)?;
        let response = self.client.get(url).send().await?;

        self.handle_response(response).await
    }

    /// Status endpoint for `task_id`, with the id encoded as one path segment
    fn status_url(&self, task_id: &JobId) -> Result<Url> {
        if task_id.is_blank() {
            return Err(ClientError::InvalidRequest(
                "task id cannot be empty".to_string(),
            ));
        }

        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ClientError::InvalidRequest(format!("Invalid base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidRequest("base URL cannot have a path".to_string()))?
            .pop_if_empty()
            .extend(["api", "v1", "tickets", "status", task_id.as_str()]);

        Ok(url)
    }
}
