use crate::models::{Candidate, Profile};
use std::fmt::Debug;

pub const BUDGET_FIT_REASON: &str = "Fits perfectly within budget";

/// Partial score produced by a single factor
#[derive(Debug, Clone, PartialEq)]
pub struct FactorScore {
    pub points: f64,
    pub reason: Option<String>,
}

impl FactorScore {
    pub fn zero() -> Self {
        Self {
            points: 0.0,
            reason: None,
        }
    }

    pub fn points(points: f64) -> Self {
        Self {
            points,
            reason: None,
        }
    }

    pub fn with_reason(points: f64, reason: impl Into<String>) -> Self {
        Self {
            points,
            reason: Some(reason.into()),
        }
    }
}

/// An independent scoring unit
///
/// Implementations own exactly one weight budget: `evaluate` must return
/// points in `[0, weight()]` whatever the input. Emitting a reason is
/// optional and decided per factor.
pub trait ScoringFactor: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn weight(&self) -> f64;

    fn evaluate(&self, candidate: &Candidate, profile: &Profile) -> FactorScore;
}

/// Binary budget threshold: full weight when the average cost fits the budget
#[derive(Debug, Clone, Copy)]
pub struct BudgetFit {
    weight: f64,
}

impl BudgetFit {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl Default for BudgetFit {
    fn default() -> Self {
        Self::new(25.0)
    }
}

impl ScoringFactor for BudgetFit {
    fn name(&self) -> &'static str {
        "budget_fit"
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    #[inline]
    fn evaluate(&self, candidate: &Candidate, profile: &Profile) -> FactorScore {
        // Missing or negative cost never fits
        match candidate.usable_cost() {
            Some(cost) if cost <= profile.budget => {
                FactorScore::with_reason(self.weight, BUDGET_FIT_REASON)
            }
            _ => FactorScore::zero(),
        }
    }
}

/// Counts candidate tags found in the career-goal text
#[derive(Debug, Clone, Copy)]
pub struct GoalAlignment {
    weight: f64,
    points_per_match: f64,
}

impl GoalAlignment {
    pub fn new(weight: f64, points_per_match: f64) -> Self {
        Self {
            weight,
            points_per_match,
        }
    }

    /// Number of tags occurring as a case-insensitive substring of `goals`
    pub fn match_count(tags: &[String], goals: &str) -> usize {
        let goals = goals.to_lowercase();
        tags.iter()
            // A blank tag is a substring of every text
            .filter(|tag| !tag.trim().is_empty())
            .filter(|tag| goals.contains(&tag.to_lowercase()))
            .count()
    }
}

impl Default for GoalAlignment {
    fn default() -> Self {
        Self::new(30.0, 10.0)
    }
}

impl ScoringFactor for GoalAlignment {
    fn name(&self) -> &'static str {
        "goal_alignment"
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    #[inline]
    fn evaluate(&self, candidate: &Candidate, profile: &Profile) -> FactorScore {
        let matches = Self::match_count(&candidate.tags, &profile.career_goals);
        FactorScore::points((matches as f64 * self.points_per_match).min(self.weight))
    }
}

/// Linear scale over the placement percentage
#[derive(Debug, Clone, Copy)]
pub struct PlacementStrength {
    weight: f64,
}

impl PlacementStrength {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl Default for PlacementStrength {
    fn default() -> Self {
        Self::new(15.0)
    }
}

impl ScoringFactor for PlacementStrength {
    fn name(&self) -> &'static str {
        "placement_strength"
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    #[inline]
    fn evaluate(&self, candidate: &Candidate, _profile: &Profile) -> FactorScore {
        FactorScore::points((candidate.usable_placement() / 100.0) * self.weight)
    }
}

/// Full weight when the candidate sits in one of the preferred countries
#[derive(Debug, Clone, Copy)]
pub struct CountryPreference {
    weight: f64,
}

impl CountryPreference {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl Default for CountryPreference {
    fn default() -> Self {
        Self::new(20.0)
    }
}

impl ScoringFactor for CountryPreference {
    fn name(&self) -> &'static str {
        "country_preference"
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn evaluate(&self, candidate: &Candidate, profile: &Profile) -> FactorScore {
        let Some(country) = candidate.country.as_deref().map(str::trim) else {
            return FactorScore::zero();
        };

        let preferred = !country.is_empty()
            && profile
                .preferred_countries
                .iter()
                .any(|c| c.trim().eq_ignore_ascii_case(country));

        if preferred {
            FactorScore::with_reason(
                self.weight,
                format!("Located in {}, one of your preferred study destinations", country),
            )
        } else {
            FactorScore::zero()
        }
    }
}

/// Decays by one point for every 50 places of world ranking
#[derive(Debug, Clone, Copy)]
pub struct WorldRanking {
    weight: f64,
}

impl WorldRanking {
    pub fn new(weight: f64) -> Self {
        Self { weight }
    }
}

impl Default for WorldRanking {
    fn default() -> Self {
        Self::new(10.0)
    }
}

impl ScoringFactor for WorldRanking {
    fn name(&self) -> &'static str {
        "world_ranking"
    }

    fn weight(&self) -> f64 {
        self.weight
    }

    fn evaluate(&self, candidate: &Candidate, _profile: &Profile) -> FactorScore {
        match candidate.world_ranking {
            Some(rank) if rank > 0 => {
                let ceiling = self.weight.max(0.0);
                FactorScore::points((ceiling - rank as f64 / 50.0).clamp(0.0, ceiling))
            }
            _ => FactorScore::zero(),
        }
    }
}

/// The three factors used by the default engine, in evaluation order
pub fn baseline_factors() -> Vec<Box<dyn ScoringFactor>> {
    vec![
        Box::new(BudgetFit::default()),
        Box::new(GoalAlignment::default()),
        Box::new(PlacementStrength::default()),
    ]
}
