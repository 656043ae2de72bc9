use serde::{Deserialize, Serialize};
use crate::models::domain::{MalformedCandidate, ScoredMentor};

/// Response for the mentor matching endpoint
#[derive(Debug, Clone, Serialize)]
pub struct MatchMentorsResponse {
    pub mentors: Vec<ScoredMentor>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
    pub skipped: Vec<MalformedCandidate>,
}

/// Response for the chat endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, details: impl ToString) -> Self {
        Self {
            error: error.into(),
            details: details.to_string(),
        }
    }
}
