use thiserror::Error;

use crate::model::ModelError;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("model returned no class probabilities")]
    EmptyProbabilities,

    #[error("score computation failed: {reason}")]
    ComputationFailed { reason: String },
}
