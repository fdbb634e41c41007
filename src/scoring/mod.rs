//! Answer scoring and feedback.
//!
//! [`AnswerEvaluator::evaluate_answer`] turns an answer into an [`Evaluation`]:
//!
//! - trimmed answers shorter than [`MIN_ANSWER_CHARS`](crate::constants::MIN_ANSWER_CHARS)
//!   score 0 without touching the model
//! - otherwise the model's output becomes a score in `0..=100`, and
//!   [`generate_feedback`] picks canned strings for the score band and word count
//! - any inference error yields [`FALLBACK_SCORE`](crate::constants::FALLBACK_SCORE)
//!   with generic feedback

pub mod error;
pub mod evaluator;
pub mod feedback;
pub mod types;


pub use error::ScoringError;
pub use evaluator::{AnswerEvaluator, fallback_evaluation, too_short_evaluation};
pub use feedback::{Feedback, generate_feedback, word_count};
pub use types::{Evaluation, EvaluationOutcome, ScoreBand};
