use serde::{Deserialize, Serialize};

use crate::constants::{EXCELLENT_SCORE_THRESHOLD, FAIR_SCORE_THRESHOLD, GOOD_SCORE_THRESHOLD};

/// How an [`Evaluation`] was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EvaluationOutcome {
    /// The model scored the answer.
    #[default]
    Scored,
    /// The answer was too short to send to the model.
    TooShort,
    /// Inference failed; the fallback score was used.
    Fallback,
}

impl EvaluationOutcome {
    pub fn as_header_value(&self) -> &'static str {
        match self {
            EvaluationOutcome::Scored => "ok",
            EvaluationOutcome::TooShort => "too_short",
            EvaluationOutcome::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for EvaluationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_header_value())
    }
}

/// Scored answer as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Score in `0..=100`.
    pub score: u8,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    #[serde(skip)]
    pub outcome: EvaluationOutcome,
}

/// Score band used to pick feedback. Bounds are inclusive on the low side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScoreBand {
    NeedsImprovement,
    Fair,
    Good,
    Excellent,
}

impl ScoreBand {
    pub fn from_score(score: u8) -> Self {
        if score >= EXCELLENT_SCORE_THRESHOLD {
            ScoreBand::Excellent
        } else if score >= GOOD_SCORE_THRESHOLD {
            ScoreBand::Good
        } else if score >= FAIR_SCORE_THRESHOLD {
            ScoreBand::Fair
        } else {
            ScoreBand::NeedsImprovement
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "excellent",
            ScoreBand::Good => "good",
            ScoreBand::Fair => "fair",
            ScoreBand::NeedsImprovement => "needs_improvement",
        }
    }
}

impl std::fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
