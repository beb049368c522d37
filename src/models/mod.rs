// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Profile, Candidate, ScoreBreakdown, ScoringWeights, DeepDiveReport, ExamRequirement, ScholarshipOption};
pub use requests::VerifyStudentQuery;
pub use responses::{RankedCandidate, RecommendationResponse, HealthResponse, ErrorResponse, VerificationResponse};
