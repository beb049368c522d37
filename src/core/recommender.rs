use crate::core::catalog::{CatalogError, CatalogSource};
use crate::core::engine::MatchEngine;
use crate::models::{Profile, ScoreBreakdown};
use thiserror::Error;
use validator::Validate;

/// Errors returned by a ranking request
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    #[error("Collaborator unavailable: {0}")]
    CollaboratorUnavailable(#[from] CatalogError),
}

/// Reject profiles the engine cannot score meaningfully
pub fn validate_profile(profile: &Profile) -> Result<(), MatchError> {
    if !profile.budget.is_finite() {
        return Err(MatchError::InvalidProfile(
            "budget must be a finite number".to_string(),
        ));
    }

    profile
        .validate()
        .map_err(|errors| MatchError::InvalidProfile(errors.to_string()))
}

/// Validates, fetches one catalog snapshot and ranks it
#[derive(Debug, Clone, Default)]
pub struct Recommender {
    engine: MatchEngine,
}

impl Recommender {
    pub fn new(engine: MatchEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    pub async fn recommend<C: CatalogSource>(
        &self,
        catalog: &C,
        profile: &Profile,
    ) -> Result<Vec<ScoreBreakdown>, MatchError> {
        validate_profile(profile)?;

        let candidates = catalog.fetch_all().await.map_err(|e| {
            tracing::error!("Catalog fetch failed: {}", e);
            MatchError::from(e)
        })?;

        let total = candidates.len();
        let ranked = self.engine.rank(profile, candidates);

        tracing::info!(
            "Ranked {} candidates (budget {}, {} factors)",
            total,
            profile.budget,
            self.engine.factor_names().len()
        );

        Ok(ranked)
    }
}
