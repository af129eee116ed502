//! Dashboard statistics and ticket history

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Overall API health as reported in the stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Healthy,
    Unhealthy,
}

impl std::fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiStatus::Healthy => write!(f, "healthy"),
            ApiStatus::Unhealthy => write!(f, "unhealthy"),
        }
    }
}

/// Aggregated counters shown on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_tickets: u64,
    pub active_tasks: u64,
    pub success_rate: f64,
    pub api_status: ApiStatus,
}

/// A previously classified ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketHistoryItem {
    pub id: i64,

    /// The user's original input
    pub text: String,
    pub intent: String,
    pub confidence: f64,
    pub language: String,

    /// Natural language answer generated for the ticket
    pub response_text: String,

    /// English translation of the input, when it was not English
    #[serde(default)]
    pub translated_text: Option<String>,

    /// Naive timestamps (no offset) are read as UTC
    #[serde(deserialize_with = "utc_or_naive::deserialize")]
    pub created_at: DateTime<Utc>,
}

mod utc_or_naive {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, de::Error};

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;

        if let Ok(timestamp) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(timestamp.with_timezone(&Utc));
        }

        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(&raw, format).ok())
            .map(|naive| naive.and_utc())
            .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw}")))
    }
}
