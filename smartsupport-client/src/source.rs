//! `StatusSource` implementation backed by the status endpoint

use async_trait::async_trait;
use smartsupport_core::StatusSource;
use smartsupport_core::domain::analysis::AnalysisResult;
use smartsupport_core::domain::task::{JobId, TaskStatusResponse};

use crate::TicketClient;
use crate::error::ClientError;

#[async_trait]
impl StatusSource for TicketClient {
    type Payload = AnalysisResult;
    type Error = ClientError;

    async fn fetch_status(
        &self,
        job_id: &JobId,
    ) -> Result<TaskStatusResponse<AnalysisResult>, ClientError> {
        self.get_ticket_status(job_id).await
    }

    fn is_transient(&self, error: &ClientError) -> bool {
        error.is_transient()
    }
}
