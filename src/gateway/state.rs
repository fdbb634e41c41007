use std::sync::Arc;

use crate::model::{Classifier, LinearClassifier, LoadedArtifacts, TfidfVectorizer, Vectorizer};
use crate::scoring::AnswerEvaluator;

/// Which artifacts made it through startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArtifactStatus {
    pub vectorizer_loaded: bool,
    pub model_loaded: bool,
}

pub struct HandlerState<V, C> {
    /// `None` unless both artifacts loaded.
    pub evaluator: Option<Arc<AnswerEvaluator<V, C>>>,

    pub artifacts: ArtifactStatus,
}

impl<V, C> Clone for HandlerState<V, C> {
    fn clone(&self) -> Self {
        Self {
            evaluator: self.evaluator.clone(),
            artifacts: self.artifacts,
        }
    }
}

impl HandlerState<TfidfVectorizer, LinearClassifier> {
    pub fn from_artifacts(artifacts: LoadedArtifacts) -> Self {
        let status = ArtifactStatus {
            vectorizer_loaded: artifacts.vectorizer_loaded(),
            model_loaded: artifacts.model_loaded(),
        };
        Self {
            evaluator: AnswerEvaluator::from_artifacts(artifacts).map(Arc::new),
            artifacts: status,
        }
    }
}

impl<V, C> HandlerState<V, C>
where
    V: Vectorizer,
    C: Classifier,
{
    pub fn new(evaluator: AnswerEvaluator<V, C>) -> Self {
        Self {
            evaluator: Some(Arc::new(evaluator)),
            artifacts: ArtifactStatus {
                vectorizer_loaded: true,
                model_loaded: true,
            },
        }
    }

    /// State for a server whose artifacts failed to load.
    pub fn unloaded(artifacts: ArtifactStatus) -> Self {
        Self {
            evaluator: None,
            artifacts,
        }
    }
}
