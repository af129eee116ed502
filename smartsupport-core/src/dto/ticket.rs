//! Ticket DTOs

use serde::{Deserialize, Serialize};

use crate::domain::task::JobId;

/// Request to classify a new ticket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketInput {
    pub text: String,
}

impl TicketInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Acknowledgement returned when a ticket is accepted
///
/// The classification itself runs asynchronously; `task_id` is what the
/// caller polls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResponse {
    pub task_id: JobId,
    pub status: String,
    pub message: String,
}
