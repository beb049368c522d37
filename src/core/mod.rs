// Core algorithm exports
pub mod catalog;
pub mod eligibility;
pub mod engine;
pub mod factors;
pub mod recommender;

pub use catalog::{CatalogError, CatalogSource, InMemoryCatalog};
pub use eligibility::{
    is_expired, is_expired_at, BatchExpiryRule, BatchRange, EligibilityDecision, EligibilityGate,
    EligibilityRule, MentorApplicant, GRADUATED_MENTOR_MESSAGE,
};
pub use engine::MatchEngine;
pub use factors::{
    BudgetFit, CountryPreference, FactorScore, GoalAlignment, PlacementStrength, ScoringFactor,
    WorldRanking,
};
pub use recommender::{validate_profile, MatchError, Recommender};
