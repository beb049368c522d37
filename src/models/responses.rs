use serde::{Deserialize, Serialize};
use crate::models::domain::ScoreBreakdown;

/// One ranked institution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCandidate {
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    pub score: u32,
    pub reasons: Vec<String>,
}

impl From<&ScoreBreakdown> for RankedCandidate {
    fn from(breakdown: &ScoreBreakdown) -> Self {
        Self {
            candidate_id: breakdown.candidate_id().to_string(),
            score: breakdown.score(),
            reasons: breakdown.reasons().to_vec(),
        }
    }
}

/// Response for the recommendations endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub results: Vec<RankedCandidate>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
}

impl RecommendationResponse {
    pub fn from_ranking(ranked: &[ScoreBreakdown]) -> Self {
        Self {
            results: ranked.iter().map(RankedCandidate::from).collect(),
            total_candidates: ranked.len(),
        }
    }
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
    pub message: String,
    pub status_code: u16,
}

/// Mentor verification response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl VerificationResponse {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            token: None,
        }
    }
}
