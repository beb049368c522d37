use crate::core::factors::{
    baseline_factors, BudgetFit, CountryPreference, GoalAlignment, PlacementStrength,
    ScoringFactor, WorldRanking,
};
use crate::models::{Candidate, Profile, ScoreBreakdown, ScoringWeights};
use rayon::prelude::*;
use std::sync::Arc;

/// Catalogs larger than this are scored on the rayon pool
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

/// Ranking orchestrator
///
/// # Pipeline
/// 1. Every factor is evaluated against every candidate, in factor order
/// 2. Partial scores are summed and truncated to an integer score
/// 3. Results are sorted by score descending, then candidate id ascending
///
/// Candidates are scored independently of each other, so large catalogs
/// are evaluated in parallel.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    factors: Vec<Arc<dyn ScoringFactor>>,
    parallel_threshold: usize,
}

impl MatchEngine {
    pub fn new(factors: Vec<Box<dyn ScoringFactor>>) -> Self {
        Self {
            factors: factors.into_iter().map(Arc::from).collect(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    /// Budget, goal alignment and placement factors with their default weights
    pub fn baseline() -> Self {
        Self::new(baseline_factors())
    }

    /// Build the factor list from configured weights
    ///
    /// The extended factors are appended after the baseline ones, so their
    /// reasons always follow the budget reason.
    pub fn from_weights(weights: &ScoringWeights, extended: bool) -> Self {
        let mut factors: Vec<Box<dyn ScoringFactor>> = vec![
            Box::new(BudgetFit::new(weights.budget)),
            Box::new(GoalAlignment::new(weights.goal, weights.goal_per_match)),
            Box::new(PlacementStrength::new(weights.placement)),
        ];

        if extended {
            factors.push(Box::new(CountryPreference::new(weights.country)));
            factors.push(Box::new(WorldRanking::new(weights.ranking)));
        }

        Self::new(factors)
    }

    pub fn with_factor<F: ScoringFactor + 'static>(mut self, factor: F) -> Self {
        self.factors.push(Arc::new(factor));
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn factor_names(&self) -> Vec<&'static str> {
        self.factors.iter().map(|f| f.name()).collect()
    }

    /// Upper bound of the raw score, the sum of all weight budgets
    pub fn max_score(&self) -> f64 {
        self.factors.iter().map(|f| f.weight()).sum()
    }

    /// Score one candidate against the profile
    pub fn score(&self, candidate: Candidate, profile: &Profile) -> ScoreBreakdown {
        if candidate.has_corrupt_fields() {
            tracing::warn!(
                "Candidate {} has missing or out-of-range cost/placement (cost={:?}, placement={:?}), scoring with safe defaults",
                candidate.id,
                candidate.avg_cost,
                candidate.placement_pct
            );
        }

        let mut total = 0.0;
        let mut reasons = Vec::new();

        for factor in &self.factors {
            let partial = factor.evaluate(&candidate, profile);
            total += clamp_to_budget(partial.points, factor.weight());
            if let Some(reason) = partial.reason {
                reasons.push(reason);
            }
        }

        ScoreBreakdown::new(candidate, total, reasons)
    }

    /// Rank every candidate against the profile
    ///
    /// # Arguments
    /// * `profile` - The already validated seeker profile
    /// * `candidates` - One snapshot of the catalog
    ///
    /// # Returns
    /// All candidates, highest score first; equal scores are ordered by
    /// candidate id so the output never depends on catalog order.
    pub fn rank(&self, profile: &Profile, candidates: Vec<Candidate>) -> Vec<ScoreBreakdown> {
        let mut ranked: Vec<ScoreBreakdown> = if candidates.len() > self.parallel_threshold {
            candidates
                .into_par_iter()
                .map(|candidate| self.score(candidate, profile))
                .collect()
        } else {
            candidates
                .into_iter()
                .map(|candidate| self.score(candidate, profile))
                .collect()
        };

        ranked.sort_by(|a, b| {
            b.score()
                .cmp(&a.score())
                .then_with(|| a.candidate_id().cmp(b.candidate_id()))
        });

        ranked
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::baseline()
    }
}

/// Keep a factor inside its own weight budget, whatever it returned
#[inline]
fn clamp_to_budget(points: f64, weight: f64) -> f64 {
    if points.is_nan() {
        return 0.0;
    }
    points.clamp(0.0, weight.max(0.0))
}
