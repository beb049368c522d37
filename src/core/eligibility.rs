use chrono::Datelike;
use std::fmt::Debug;
use std::sync::Arc;

pub const GRADUATED_MENTOR_MESSAGE: &str = "Graduated students cannot register as mentors.";

/// Outcome of an eligibility check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityDecision {
    pub eligible: bool,
    pub reason: String,
}

impl EligibilityDecision {
    pub fn allow(reason: impl Into<String>) -> Self {
        Self {
            eligible: true,
            reason: reason.into(),
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            eligible: false,
            reason: reason.into(),
        }
    }
}

/// Input to the mentor eligibility rules
#[derive(Debug, Clone)]
pub struct MentorApplicant<'a> {
    pub student_id: &'a str,
    pub batch_range: &'a str,
}

/// Batch range after parsing `"<startYear>-<endYear>"`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchRange {
    GraduatesIn(i32),
    Malformed,
}

impl BatchRange {
    /// Read the graduation year from the text after the first separator
    pub fn parse(raw: &str) -> Self {
        raw.split('-')
            .nth(1)
            .and_then(|year| year.trim().parse::<i32>().ok())
            .map_or(BatchRange::Malformed, BatchRange::GraduatesIn)
    }

    /// Fail-closed: a malformed range is always expired
    pub fn is_expired_at(self, current_year: i32) -> bool {
        match self {
            BatchRange::GraduatesIn(year) => year < current_year,
            BatchRange::Malformed => true,
        }
    }
}

/// Whether the batch graduated before the current calendar year
pub fn is_expired(batch_range: &str) -> bool {
    is_expired_at(batch_range, current_year())
}

pub fn is_expired_at(batch_range: &str, current_year: i32) -> bool {
    BatchRange::parse(batch_range).is_expired_at(current_year)
}

/// Calendar year on the server's local clock
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// A declarative check yielding a decision and its reason
pub trait EligibilityRule: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    fn evaluate(&self, applicant: &MentorApplicant<'_>, current_year: i32) -> EligibilityDecision;
}

/// Rejects applicants whose batch has graduated or cannot be read
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchExpiryRule;

impl EligibilityRule for BatchExpiryRule {
    fn name(&self) -> &'static str {
        "batch_expiry"
    }

    fn evaluate(&self, applicant: &MentorApplicant<'_>, current_year: i32) -> EligibilityDecision {
        match BatchRange::parse(applicant.batch_range) {
            BatchRange::GraduatesIn(year) if year >= current_year => {
                EligibilityDecision::allow(format!("Batch graduates in {}", year))
            }
            BatchRange::GraduatesIn(year) => {
                tracing::info!(
                    "Student {} graduated in {} (current year {})",
                    applicant.student_id,
                    year,
                    current_year
                );
                EligibilityDecision::deny(GRADUATED_MENTOR_MESSAGE)
            }
            BatchRange::Malformed => {
                tracing::info!(
                    "Student {} sent malformed batch range {:?}, treating as expired",
                    applicant.student_id,
                    applicant.batch_range
                );
                EligibilityDecision::deny(GRADUATED_MENTOR_MESSAGE)
            }
        }
    }
}

/// Ordered rule set; the first denial wins
#[derive(Debug, Clone)]
pub struct EligibilityGate {
    rules: Vec<Arc<dyn EligibilityRule>>,
}

impl EligibilityGate {
    pub fn new(rules: Vec<Arc<dyn EligibilityRule>>) -> Self {
        Self { rules }
    }

    /// Gate used by the mentor verification workflow
    pub fn mentor() -> Self {
        Self::new(vec![Arc::new(BatchExpiryRule)])
    }

    pub fn with_rule<R: EligibilityRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn evaluate(&self, applicant: &MentorApplicant<'_>) -> EligibilityDecision {
        self.evaluate_at(applicant, current_year())
    }

    pub fn evaluate_at(&self, applicant: &MentorApplicant<'_>, current_year: i32) -> EligibilityDecision {
        let mut last = EligibilityDecision::allow("No eligibility rules configured");

        for rule in &self.rules {
            let decision = rule.evaluate(applicant, current_year);
            if !decision.eligible {
                tracing::debug!("Rule {} rejected student {}", rule.name(), applicant.student_id);
                return decision;
            }
            last = decision;
        }

        last
    }
}

impl Default for EligibilityGate {
    fn default() -> Self {
        Self::mentor()
    }
}
