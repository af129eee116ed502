//! Classification result types

use serde::{Deserialize, Serialize};

/// One predicted intent label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    /// Confidence between 0.0 and 1.0
    pub score: f64,
}

/// Result payload of a finished classification task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Detected language of the ticket text
    pub language: String,

    /// Top predicted intent
    pub intent: String,

    /// Confidence of the top prediction
    pub confidence: f64,

    /// Top predictions, best first
    #[serde(default)]
    pub predictions: Vec<Prediction>,

    /// Ticket text with personal data stripped, when the backend provides it
    #[serde(default)]
    pub sanitized_text: Option<String>,
}

impl AnalysisResult {
    /// The best prediction, falling back to `intent`/`confidence`
    pub fn top_prediction(&self) -> Prediction {
        self.predictions.first().cloned().unwrap_or_else(|| Prediction {
            label: self.intent.clone(),
            score: self.confidence,
        })
    }
}
