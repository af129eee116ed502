//! Service health types

use serde::{Deserialize, Serialize};

/// Body of the `/health` endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub models_loaded: bool,
}

impl HealthCheckResponse {
    /// Healthy and ready to classify
    pub fn is_ready(&self) -> bool {
        self.status == "healthy" && self.models_loaded
    }
}

/// Body of the API root endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub status: String,
}
