//! UniSphere Match - multi-factor university matching service
//!
//! This library provides the weighted matching engine that ranks a
//! university catalog against a student profile, the batch-year gate
//! guarding mentor verification, and the thin service layer around them.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{MatchEngine, Recommender, ScoringFactor, EligibilityGate, is_expired};
pub use models::{Profile, Candidate, ScoreBreakdown, DeepDiveReport, RecommendationResponse};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let engine = MatchEngine::default();
        assert_eq!(engine.factor_names().len(), 3);
        assert!(is_expired("not-a-batch"));
    }
}
