use serde::{Deserialize, Serialize};
use validator::Validate;

/// Prospective student profile submitted for ranking
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Profile {
    #[validate(range(min = 0.0))]
    pub budget: f64,
    #[serde(rename = "careerGoals")]
    pub career_goals: String,
    #[serde(rename = "preferredCountries", default)]
    pub preferred_countries: Vec<String>,
}

impl Profile {
    pub fn new(budget: f64, career_goals: impl Into<String>) -> Self {
        Self {
            budget,
            career_goals: career_goals.into(),
            preferred_countries: Vec::new(),
        }
    }

    pub fn with_preferred_countries(mut self, countries: Vec<String>) -> Self {
        self.preferred_countries = countries;
        self
    }
}

/// Institution from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "avgCost", alias = "avgFees", default)]
    pub avg_cost: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "placementPct", alias = "avgPlacement", default)]
    pub placement_pct: Option<f64>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(rename = "worldRanking", default)]
    pub world_ranking: Option<u32>,
}

impl Candidate {
    pub fn new(id: impl Into<String>, avg_cost: f64, tags: &[&str], placement_pct: f64) -> Self {
        Self {
            id: id.into(),
            name: None,
            avg_cost: Some(avg_cost),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            placement_pct: Some(placement_pct),
            country: None,
            world_ranking: None,
        }
    }

    /// Average cost, or `None` when missing, negative or not a number
    pub fn usable_cost(&self) -> Option<f64> {
        self.avg_cost.filter(|cost| cost.is_finite() && *cost >= 0.0)
    }

    /// Placement percentage clamped to 0-100; missing or invalid values read as 0
    pub fn usable_placement(&self) -> f64 {
        match self.placement_pct {
            Some(pct) if pct.is_finite() && pct >= 0.0 => pct.min(100.0),
            _ => 0.0,
        }
    }

    /// True when any scored field had to be replaced by a safe default
    pub fn has_corrupt_fields(&self) -> bool {
        self.usable_cost().is_none()
            || !matches!(self.placement_pct, Some(pct) if pct.is_finite() && (0.0..=100.0).contains(&pct))
    }
}

/// Scored ranking entry for one candidate
///
/// Built once by the engine and read through accessors afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    candidate: Candidate,
    raw_score: f64,
    score: u32,
    reasons: Vec<String>,
}

impl ScoreBreakdown {
    pub(crate) fn new(candidate: Candidate, raw_score: f64, reasons: Vec<String>) -> Self {
        // Truncation toward zero, never rounding: 29.99 scores 29
        let score = raw_score.max(0.0).trunc() as u32;
        Self {
            candidate,
            raw_score,
            score,
            reasons,
        }
    }

    pub fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    pub fn candidate_id(&self) -> &str {
        &self.candidate.id
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Exact sum of the factor contributions before truncation
    pub fn raw_score(&self) -> f64 {
        self.raw_score
    }

    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }
}

/// Factor weight budgets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub budget: f64,
    pub goal: f64,
    pub goal_per_match: f64,
    pub placement: f64,
    pub country: f64,
    pub ranking: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            budget: 25.0,
            goal: 30.0,
            goal_per_match: 10.0,
            placement: 15.0,
            country: 20.0,
            ranking: 10.0,
        }
    }
}

/// Structured enrichment report for one institution, produced by the AI collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeepDiveReport {
    pub official_website: String,
    pub infrastructure: String,
    #[serde(default)]
    pub departments: Vec<String>,
    #[serde(default)]
    pub entrance_exams: Vec<ExamRequirement>,
    #[serde(default)]
    pub scholarships: Vec<ScholarshipOption>,
    #[serde(default)]
    pub language_requirements: Vec<String>,
    #[serde(default, alias = "professors")]
    pub professor_highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamRequirement {
    pub name: String,
    #[serde(default)]
    pub details: String,
    #[serde(rename = "applicationLink", alias = "link", default)]
    pub application_link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScholarshipOption {
    pub title: String,
    #[serde(default)]
    pub eligibility: String,
    #[serde(default)]
    pub link: String,
}
