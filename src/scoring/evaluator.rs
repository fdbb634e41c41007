use tracing::{debug, instrument, warn};

use crate::constants::{FALLBACK_SCORE, MAX_SCORE, MIN_ANSWER_CHARS};
use crate::model::{Classifier, LinearClassifier, LoadedArtifacts, TfidfVectorizer, Vectorizer};

use super::error::ScoringError;
use super::feedback::{IMPROVEMENT_MORE_DETAIL, generate_feedback};
use super::types::{Evaluation, EvaluationOutcome};

pub const TOO_SHORT_FEEDBACK: &str =
    "Answer is too short. Please provide a more detailed response.";
pub const FALLBACK_FEEDBACK: &str = "Unable to evaluate answer accurately. Please try again.";

/// Scores answers with a vectorizer and classifier loaded once at startup.
pub struct AnswerEvaluator<V, C> {
    vectorizer: V,
    classifier: C,
}

impl<V, C> std::fmt::Debug for AnswerEvaluator<V, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerEvaluator").finish_non_exhaustive()
    }
}

impl AnswerEvaluator<TfidfVectorizer, LinearClassifier> {
    /// Builds an evaluator if both artifacts loaded.
    pub fn from_artifacts(artifacts: LoadedArtifacts) -> Option<Self> {
        let ((vectorizer, _), (classifier, _)) = (artifacts.vectorizer?, artifacts.model?);

        if vectorizer.dimension() != classifier.n_features() {
            warn!(
                vectorizer_dim = vectorizer.dimension(),
                model_features = classifier.n_features(),
                "Vectorizer and model disagree on feature count; every evaluation will fall back"
            );
        }

        Some(Self::new(vectorizer, classifier))
    }
}

impl<V, C> AnswerEvaluator<V, C>
where
    V: Vectorizer,
    C: Classifier,
{
    pub fn new(vectorizer: V, classifier: C) -> Self {
        Self {
            vectorizer,
            classifier,
        }
    }

    pub fn vectorizer(&self) -> &V {
        &self.vectorizer
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Scores `answer`. The question is accepted for API symmetry but does not
    /// affect the score.
    #[instrument(skip_all, fields(answer_chars = answer.chars().count()))]
    pub fn evaluate_answer(&self, _question: &str, answer: &str) -> Evaluation {
        if answer.trim().chars().count() < MIN_ANSWER_CHARS {
            debug!("Answer below minimum length, skipping model");
            return too_short_evaluation();
        }

        match self.score(answer) {
            Ok(score) => {
                let feedback = generate_feedback(score, answer);
                debug!(score, "Answer scored");
                Evaluation {
                    score,
                    feedback: feedback.feedback,
                    strengths: feedback.strengths,
                    improvements: feedback.improvements,
                    outcome: EvaluationOutcome::Scored,
                }
            }
            Err(e) => {
                warn!(error = %e, "Evaluation failed, returning fallback score");
                fallback_evaluation()
            }
        }
    }

    /// Runs the model and maps its output to `0..=100`.
    ///
    /// With probabilities: the rounded maximum class probability as a percentage.
    /// Without: a numeric label truncated toward zero, or [`FALLBACK_SCORE`] for a
    /// text label.
    pub fn score(&self, answer: &str) -> Result<u8, ScoringError> {
        let features = self.vectorizer.transform(answer)?;

        // A failing predict() falls back even when probabilities are available.
        let label = self.classifier.predict(&features)?;

        let raw = match self.classifier.predict_proba(&features) {
            Some(proba) => {
                let proba = proba?;
                if let Some(bad) = proba.iter().find(|p| !p.is_finite()) {
                    return Err(ScoringError::ComputationFailed {
                        reason: format!("non-finite class probability {}", bad),
                    });
                }
                let max = proba
                    .iter()
                    .copied()
                    .reduce(f64::max)
                    .ok_or(ScoringError::EmptyProbabilities)?;
                (max * 100.0).round()
            }
            None => match label.as_numeric() {
                Some(value) => value.trunc(),
                None => f64::from(FALLBACK_SCORE),
            },
        };

        clamp_score(raw)
    }
}

fn clamp_score(raw: f64) -> Result<u8, ScoringError> {
    if !raw.is_finite() {
        return Err(ScoringError::ComputationFailed {
            reason: format!("non-finite score {}", raw),
        });
    }
    Ok(raw.clamp(0.0, f64::from(MAX_SCORE)) as u8)
}

pub fn too_short_evaluation() -> Evaluation {
    Evaluation {
        score: 0,
        feedback: TOO_SHORT_FEEDBACK.to_string(),
        strengths: Vec::new(),
        improvements: vec![
            IMPROVEMENT_MORE_DETAIL.to_string(),
            "Add relevant examples".to_string(),
            "Elaborate on key points".to_string(),
        ],
        outcome: EvaluationOutcome::TooShort,
    }
}

pub fn fallback_evaluation() -> Evaluation {
    Evaluation {
        score: FALLBACK_SCORE,
        feedback: FALLBACK_FEEDBACK.to_string(),
        strengths: vec!["Answer provided".to_string()],
        improvements: vec!["Ensure answer is clear and well-structured".to_string()],
        outcome: EvaluationOutcome::Fallback,
    }
}
