use serde::{Deserialize, Serialize};

use crate::domain::tweet::ExtractionResult;

/// Aggregate outcome of a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Success,
    PartialSuccess,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResponse {
    pub status: BatchStatus,
    pub message: String,
    pub results: Vec<ExtractionResult>,
}

impl BatchResponse {
    /// Summarize per-URL results, kept in request order.
    pub fn summarize(results: Vec<ExtractionResult>) -> Self {
        let total = results.len();
        let succeeded = results.iter().filter(|r| r.is_success()).count();

        let (status, message) = if succeeded == 0 {
            (
                BatchStatus::Error,
                "Failed to extract data from any tweets".to_string(),
            )
        } else if succeeded < total {
            (
                BatchStatus::PartialSuccess,
                format!("Successfully extracted data from {succeeded} of {total} tweets"),
            )
        } else {
            (
                BatchStatus::Success,
                format!("Successfully extracted data from all {total} tweets"),
            )
        };

        Self {
            status,
            message,
            results,
        }
    }
}
